pub(crate) mod banner;
pub(crate) mod component;
pub(crate) mod features;
pub(crate) mod header;
pub(crate) mod hint_bar;
pub(crate) mod infrastructure;
pub(crate) mod metrics;

pub(crate) use banner::BannerComponent;
pub(crate) use component::Component;
pub(crate) use features::FeaturesComponent;
pub(crate) use header::HeaderComponent;
pub(crate) use hint_bar::HintBarComponent;
pub(crate) use infrastructure::InfrastructureComponent;
pub(crate) use metrics::MetricCardComponent;
