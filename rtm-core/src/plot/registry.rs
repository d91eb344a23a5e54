use crate::plot::config::{
    GridSweepConfig, LegendSweepConfig, PlotterConfig, SingleSweepAllConfig, SingleSweepConfig,
};

/// Constructor for one kind of plotter config.
pub type ConfigFactory = fn() -> Box<dyn PlotterConfig>;

/// Ordered list of the plotter configs offered to the user. Order is the
/// selector order.
#[derive(Default, Clone)]
pub struct PlotterRegistry {
    factories: Vec<ConfigFactory>,
}

impl PlotterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(SingleSweepConfig::create);
        registry.register(SingleSweepAllConfig::create);
        registry.register(LegendSweepConfig::create);
        registry.register(GridSweepConfig::create);
        registry
    }

    /// Appends `factory` and hands it back unchanged.
    pub fn register(&mut self, factory: ConfigFactory) -> ConfigFactory {
        self.factories.push(factory);
        factory
    }

    pub fn iter(&self) -> impl Iterator<Item = ConfigFactory> + '_ {
        self.factories.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_order_is_registration_order() {
        let names: Vec<String> = PlotterRegistry::builtin()
            .iter()
            .map(|factory| factory().display_name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "Single Sweep",
                "Single Sweep - all",
                "Legend Sweep",
                "2D Grid Comparison"
            ]
        );
    }

    #[test]
    fn register_allows_duplicates() {
        let mut registry = PlotterRegistry::new();
        let returned = registry.register(SingleSweepConfig::create);
        registry.register(returned);
        assert_eq!(registry.len(), 2);
    }
}
