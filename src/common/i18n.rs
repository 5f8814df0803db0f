// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "en";

const EN: &[(&str, &str)] = &[
    ("validation", "One or more fields are invalid."),
    ("email_exists", "This e-mail is already in use."),
    ("invalid_credentials", "Invalid e-mail or password."),
    ("invalid_token", "Missing or invalid authentication token."),
    ("user_not_found", "User not found."),
    ("user_inactive", "This account has been deactivated."),
    ("invalid_role", "This role cannot be assigned here."),
    ("company_not_found", "Company not found."),
    ("company_inactive", "This company account is inactive."),
    ("forbidden", "You do not have permission to perform this action."),
    ("limit_exceeded", "Your plan limit has been reached. Please upgrade your plan."),
    ("storage_quota_exceeded", "Storage quota exceeded."),
    ("record_not_found", "Record not found."),
    ("negative_stock", "Stock quantity cannot go below zero."),
    ("plan_not_found", "Subscription plan not found."),
    ("invalid_request_state", "This request has already been decided."),
    ("file_too_large", "The file is too large."),
    ("invalid_path", "Invalid file path."),
    ("internal", "An unexpected error occurred."),
];

const TR: &[(&str, &str)] = &[
    ("validation", "Bir veya daha fazla alan geçersiz."),
    ("email_exists", "Bu e-posta adresi zaten kullanılıyor."),
    ("invalid_credentials", "E-posta veya şifre hatalı."),
    ("invalid_token", "Kimlik doğrulama anahtarı eksik veya geçersiz."),
    ("user_not_found", "Kullanıcı bulunamadı."),
    ("user_inactive", "Bu hesap devre dışı bırakılmış."),
    ("invalid_role", "Bu rol burada atanamaz."),
    ("company_not_found", "Şirket bulunamadı."),
    ("company_inactive", "Şirket hesabı aktif değil."),
    ("forbidden", "Bu işlem için yetkiniz yok."),
    ("limit_exceeded", "Paket limitinize ulaştınız. Lütfen paketinizi yükseltin."),
    ("storage_quota_exceeded", "Depolama kotası aşıldı."),
    ("record_not_found", "Kayıt bulunamadı."),
    ("negative_stock", "Stok miktarı sıfırın altına düşemez."),
    ("plan_not_found", "Abonelik paketi bulunamadı."),
    ("invalid_request_state", "Bu talep zaten sonuçlandırılmış."),
    ("file_too_large", "Dosya çok büyük."),
    ("invalid_path", "Geçersiz dosya yolu."),
    ("internal", "Beklenmeyen bir hata oluştu."),
];

const PT: &[(&str, &str)] = &[
    ("validation", "Um ou mais campos são inválidos."),
    ("email_exists", "Este e-mail já está em uso."),
    ("invalid_credentials", "E-mail ou senha inválidos."),
    ("invalid_token", "Token de autenticação inválido ou ausente."),
    ("user_not_found", "Usuário não encontrado."),
    ("user_inactive", "Esta conta foi desativada."),
    ("invalid_role", "Este papel não pode ser atribuído aqui."),
    ("company_not_found", "Empresa não encontrada."),
    ("company_inactive", "A conta da empresa está inativa."),
    ("forbidden", "Você não tem permissão para realizar esta ação."),
    ("limit_exceeded", "O limite do seu plano foi atingido. Faça um upgrade."),
    ("storage_quota_exceeded", "Cota de armazenamento excedida."),
    ("record_not_found", "Registro não encontrado."),
    ("negative_stock", "O estoque não pode ficar negativo."),
    ("plan_not_found", "Plano de assinatura não encontrado."),
    ("invalid_request_state", "Esta solicitação já foi decidida."),
    ("file_too_large", "O arquivo é grande demais."),
    ("invalid_path", "Caminho de arquivo inválido."),
    ("internal", "Ocorreu um erro inesperado."),
];

/// Catálogo de mensagens por idioma. Idiomas desconhecidos caem no inglês.
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let catalogs = [("en", EN), ("tr", TR), ("pt", PT)]
            .into_iter()
            .map(|(lang, entries)| (lang, entries.iter().copied().collect()))
            .collect();
        Self { catalogs }
    }

    pub fn translate<'a>(&'a self, lang: &str, key: &'a str) -> &'a str {
        self.catalogs
            .get(lang)
            .and_then(|catalog| catalog.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|c| c.get(key)))
            .copied()
            .unwrap_or(key)
    }

    pub fn supports(&self, lang: &str) -> bool {
        self.catalogs.contains_key(lang)
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_english() {
        let store = I18nStore::new();
        assert_eq!(store.translate("de", "negative_stock"), "Stock quantity cannot go below zero.");
    }

    #[test]
    fn unknown_key_is_returned_verbatim() {
        let store = I18nStore::new();
        assert_eq!(store.translate("tr", "no_such_key"), "no_such_key");
    }

    #[test]
    fn every_catalog_covers_the_english_keys() {
        let store = I18nStore::new();
        for (key, _) in EN {
            for lang in ["tr", "pt"] {
                assert!(store.catalogs[lang].contains_key(key), "{lang} missing {key}");
            }
        }
    }
}
