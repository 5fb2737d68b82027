// src/common/i18n.rs

use std::collections::HashMap;

use anyhow::Context;

use crate::models::orders::OrderStatus;

pub const DEFAULT_LANG: &str = "fr";
pub const SUPPORTED_LANGS: [&str; 2] = ["fr", "ar"];

const FR: &str = include_str!("../../locales/fr.json");
const AR: &str = include_str!("../../locales/ar.json");

/// Dicionários carregados uma vez na inicialização.
/// Busca: idioma pedido -> francês -> a própria chave.
#[derive(Debug, Clone)]
pub struct I18nStore {
    dictionaries: HashMap<String, HashMap<String, String>>,
}

impl I18nStore {
    pub fn load() -> anyhow::Result<Self> {
        let mut dictionaries = HashMap::new();
        for (lang, raw) in [("fr", FR), ("ar", AR)] {
            let dict: HashMap<String, String> = serde_json::from_str(raw)
                .with_context(|| format!("dicionário '{}' inválido", lang))?;

            // Rótulos de status aparecem na fatura: faltar um é erro de deploy
            for status in OrderStatus::ALL {
                let key = status.label_key();
                if !dict.contains_key(&key) {
                    anyhow::bail!("dicionário '{}' sem a chave '{}'", lang, key);
                }
            }
            dictionaries.insert(lang.to_string(), dict);
        }
        Ok(Self { dictionaries })
    }

    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.lookup(lang, key)
            .or_else(|| self.lookup(DEFAULT_LANG, key))
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }

    /// Igual a `translate`, substituindo `{nome}` pelos argumentos.
    pub fn translate_with(&self, lang: &str, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.translate(lang, key);
        for (name, value) in args {
            text = text.replace(&format!("{{{}}}", name), value);
        }
        text
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<&str> {
        self.dictionaries
            .get(lang)
            .and_then(|dict| dict.get(key))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_dictionaries_have_the_same_keys() {
        let store = I18nStore::load().unwrap();
        let fr = &store.dictionaries["fr"];
        let ar = &store.dictionaries["ar"];

        for key in fr.keys() {
            assert!(ar.contains_key(key), "faltando em ar: {}", key);
        }
        assert_eq!(fr.len(), ar.len());
    }

    #[test]
    fn test_every_status_has_a_label() {
        let store = I18nStore::load().unwrap();
        for status in OrderStatus::ALL {
            let key = status.label_key();
            assert_ne!(store.translate("fr", &key), key);
            assert_ne!(store.translate("ar", &key), key);
        }
        assert_eq!(store.translate("fr", "status.shipping"), "En cours de livraison");
    }

    #[test]
    fn test_fallbacks() {
        let store = I18nStore::load().unwrap();
        assert_eq!(store.translate("de", "invoice.title"), "FACTURE");
        assert_eq!(store.translate("fr", "unknown.key"), "unknown.key");
    }

    #[test]
    fn test_placeholders() {
        let store = I18nStore::load().unwrap();
        assert_eq!(
            store.translate_with("fr", "error.zone_not_found", &[("code", "99")]),
            "Wilaya introuvable: 99"
        );
    }
}
