//! Настройки импортёра. Загружаются CLI из TOML/окружения, в тестах строятся напрямую.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImporterConfig {
    /// Счёт карты в книге, на него идут все проводки и баланс.
    pub main_account: String,
    /// Встречный счёт; если не задан, вторая проводка не создаётся.
    pub target_account: Option<String>,
    /// Номер карты/счёта, который должен встречаться в начале файла.
    pub account_number: String,
    pub custom_header: Option<String>,
    pub convert_currencies: bool,
    pub currency: String,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            main_account: "Liabilities:CreditCard:SCB".into(),
            target_account: None,
            account_number: String::new(),
            custom_header: None,
            convert_currencies: false,
            currency: "SGD".into(),
        }
    }
}
