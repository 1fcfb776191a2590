//! UI state that persists across frames

use bevy::prelude::*;

use crate::lib::catalog::ModelCatalog;

/// Global UI state resource
#[derive(Resource, Debug, Clone, Default)]
pub struct UiState {
    /// Model picked in the dropdown, applied by the "Load" button
    pub chosen_model: Option<String>,
}

impl UiState {
    /// Dropdown selection, falling back to the active model and then to the
    /// first model in the catalog
    pub fn chosen_or<'a>(&'a self, active: Option<&'a str>, catalog: &'a ModelCatalog) -> &'a str {
        self.chosen_model
            .as_deref()
            .or(active)
            .unwrap_or_else(|| catalog.default_model())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chosen_model_fallbacks() {
        let catalog = ModelCatalog::default();
        let mut state = UiState::default();

        assert_eq!(state.chosen_or(None, &catalog), "dolphin");
        assert_eq!(state.chosen_or(Some("deer"), &catalog), "deer");

        state.chosen_model = Some("cat".to_string());
        assert_eq!(state.chosen_or(Some("deer"), &catalog), "cat");
    }
}
