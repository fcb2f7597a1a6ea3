//! Email address utilities

/// Longest address accepted (RFC 5321 path limit)
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Longest local part accepted (RFC 5321 section 4.5.3.1.1)
pub const MAX_LOCAL_PART_LENGTH: usize = 64;

/// Trim surrounding whitespace and lowercase the address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Syntactic check on an already-normalized address
///
/// Anything accepted here must also be accepted by the mail transports, so
/// the local part is restricted to an unquoted dot-atom and the domain must
/// contain at least one dot.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return false;
    }
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    if local.len() > MAX_LOCAL_PART_LENGTH || !is_dot_atom(local) || !domain.contains('.') {
        return false;
    }
    validator::validate_email(email)
}

fn is_dot_atom(local: &str) -> bool {
    !local.is_empty() && local.split('.').all(|atom| !atom.is_empty())
}

/// Local part of an address, or the whole input when there is no `@`
pub fn local_part(email: &str) -> &str {
    email.split_once('@').map(|(local, _)| local).unwrap_or(email)
}

/// Mask an address for logs (e.g., j***@example.com)
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}
