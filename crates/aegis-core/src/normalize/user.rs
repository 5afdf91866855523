use serde_json::Value;

use super::fields::user as f;
use super::record::Record;
use crate::model::User;

/// Role and status are lowercased so filters compare exactly.
pub fn normalize_user(raw: &Value) -> User {
    let r = Record::new(raw);
    User {
        id: r.string(&f::ID).unwrap_or_default(),
        name: r.string(&f::NAME),
        email: r.string(&f::EMAIL),
        phone: r.string(&f::PHONE),
        role: r.string(&f::ROLE).map(|s| s.to_lowercase()),
        specialization: r.string(&f::SPECIALIZATION),
        status: r.string(&f::STATUS).map(|s| s.to_lowercase()),
        created_at: r.timestamp(&f::CREATED_AT),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn user_variants_and_idempotence() {
        let a = normalize_user(&json!({
            "id": 3,
            "full_name": "Rina",
            "phone_number": "0812",
            "role": "Technician",
            "created_at": "2024-01-10"
        }));
        assert_eq!(a.name.as_deref(), Some("Rina"));
        assert_eq!(a.phone.as_deref(), Some("0812"));
        assert_eq!(a.role.as_deref(), Some("technician"));
        let again = normalize_user(&serde_json::to_value(&a).unwrap());
        assert_eq!(again, a);
    }
}
