use serde::{Deserialize, Serialize};

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guide {
    email: String,
    password: String,
    name: String,
    emergency_contact: String
}

impl Guide {
    pub(super) fn new(email: String, password: String, name: String, emergency_contact: String) -> Self {
        Guide { email: email, password: password, name: name, emergency_contact: emergency_contact }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn emergency_contact(&self) -> &str {
        &self.emergency_contact
    }

    /// Callers check every value first, so an update is never half applied.
    pub(super) fn overwrite(&mut self, password: &str, name: &str, emergency_contact: &str) {
        self.password = password.to_string();
        self.name = name.to_string();
        self.emergency_contact = emergency_contact.to_string();
    }

    /// Name of the first empty field, if any.
    pub(super) fn first_empty_field(&self) -> Option<&'static str> {
        [("email", &self.email), ("password", &self.password), ("name", &self.name), ("emergency contact", &self.emergency_contact)]
            .into_iter()
            .find(|(_, value)| value.is_empty())
            .map(|(field, _)| field)
    }
}

impl fmt::Display for Guide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "email: {}, name: {}, emergency contact: {}", self.email, self.name, self.emergency_contact)
    }
}

#[test]
fn test_guide() {
    let mut guide = Guide::new("alice".to_string(), "pw".to_string(), "AliceSmith".to_string(), "bob".to_string());
    assert_eq!(guide.first_empty_field(), None);
    assert_eq!(format!("{}", guide), "email: alice, name: AliceSmith, emergency contact: bob");

    guide.overwrite("secret", "AliceJones", "carl");
    assert_eq!(guide.name(), "AliceJones");
    assert_eq!(guide.password(), "secret");
    assert_eq!(guide.emergency_contact(), "carl");
    assert_eq!(guide.email(), "alice");

    let incomplete = Guide::new("carol".to_string(), "pw".to_string(), "".to_string(), "".to_string());
    assert_eq!(incomplete.first_empty_field(), Some("name"));
}
