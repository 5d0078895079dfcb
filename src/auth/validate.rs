//! Form validation run before anything is sent to the backend. Each check
//! returns `Some(message)` on failure.

pub const MIN_PASSWORD: usize = 8;
pub const MIN_USER_PASSWORD: usize = 6;
pub const MIN_NAME: usize = 3;
pub const CODE_LEN: usize = 6;

/// Validate an email: required, `local@domain.tld`, no whitespace, max 254.
pub fn validate_email(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Some("O e-mail é obrigatório.".to_string());
    }
    if trimmed.len() > 254 || !looks_like_email(trimmed) {
        return Some("E-mail inválido.".to_string());
    }
    None
}

fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

pub fn validate_password(password: &str, min_len: usize) -> Option<String> {
    if password.is_empty() {
        return Some("A senha é obrigatória.".to_string());
    }
    if password.chars().count() < min_len {
        return Some(format!("A senha deve ter pelo menos {min_len} caracteres."));
    }
    None
}

pub fn validate_confirmation(password: &str, confirmation: &str) -> Option<String> {
    if confirmation.is_empty() {
        return Some("Confirmação de senha obrigatória.".to_string());
    }
    if password != confirmation {
        return Some("As senhas devem ser iguais.".to_string());
    }
    None
}

/// The reset endpoint rejects `!` in passwords.
pub fn validate_reset_password(password: &str) -> Option<String> {
    validate_password(password, MIN_PASSWORD).or_else(|| {
        password
            .contains('!')
            .then(|| "A senha não pode conter '!'.".to_string())
    })
}

/// Required name with a minimum length. `subject` reads like
/// "O nome do curso".
pub fn validate_name(value: &str, subject: &str, min_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{subject} é obrigatório."));
    }
    if trimmed.chars().count() < min_len {
        return Some(format!("{subject} deve conter pelo menos {min_len} letras."));
    }
    if trimmed.chars().count() > 255 {
        return Some(format!("{subject} deve ter no máximo 255 caracteres."));
    }
    None
}

/// Verification and reset codes are exactly six digits.
pub fn validate_code(code: &str) -> Option<String> {
    let trimmed = code.trim();
    if trimmed.len() != CODE_LEN || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Some(format!("Informe o código de {CODE_LEN} dígitos."));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_rules() {
        assert!(validate_email("ana@example.com").is_none());
        assert!(validate_email("  ana@example.com ").is_none());
        assert_eq!(validate_email("").as_deref(), Some("O e-mail é obrigatório."));
        for bad in ["ana", "ana@", "@example.com", "ana@example", "a b@example.com", "a@b@c.com", "ana@.com"] {
            assert_eq!(validate_email(bad).as_deref(), Some("E-mail inválido."), "{bad}");
        }
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("12345678", MIN_PASSWORD).is_none());
        assert!(validate_password("1234567", MIN_PASSWORD).is_some());
        assert!(validate_password("123456", MIN_USER_PASSWORD).is_none());
        assert_eq!(validate_password("", MIN_PASSWORD).as_deref(), Some("A senha é obrigatória."));
    }

    #[test]
    fn confirmation_must_match() {
        assert!(validate_confirmation("segredo123", "segredo123").is_none());
        assert_eq!(validate_confirmation("segredo123", "segredo12").as_deref(), Some("As senhas devem ser iguais."));
        assert!(validate_confirmation("segredo123", "").is_some());
    }

    #[test]
    fn reset_password_rejects_bang() {
        assert!(validate_reset_password("segredo123").is_none());
        assert_eq!(validate_reset_password("segredo!23").as_deref(), Some("A senha não pode conter '!'."));
        assert!(validate_reset_password("curta").is_some());
    }

    #[test]
    fn name_rules() {
        assert!(validate_name("Rust", "O nome do curso", MIN_NAME).is_none());
        assert_eq!(validate_name(" ", "O nome do curso", MIN_NAME).as_deref(), Some("O nome do curso é obrigatório."));
        assert_eq!(
            validate_name("Go", "O nome do curso", MIN_NAME).as_deref(),
            Some("O nome do curso deve conter pelo menos 3 letras.")
        );
    }

    #[test]
    fn code_rules() {
        assert!(validate_code("123456").is_none());
        assert!(validate_code(" 123456 ").is_none());
        assert!(validate_code("12345").is_some());
        assert!(validate_code("12345a").is_some());
        assert!(validate_code("1234567").is_some());
    }
}
