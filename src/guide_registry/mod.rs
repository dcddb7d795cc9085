mod guide;

pub use crate::guide_registry::guide::Guide;

use std::collections::HashMap;
use std::collections::hash_map::Entry;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("A guide with email {0} already exists")]
    DuplicateEmail(String),
    #[error("There is no guide with email {0}")]
    NotFound(String)
}

/// Guides keyed by email. At most one guide per email; every failed call leaves the registry untouched.
pub struct GuideRegistry {
    guides: HashMap<String, Guide>,
    modified: bool
}

fn check_not_empty(fields: &[(&str, &str)]) -> Result<(), RegistryError> {
    match fields.iter().find(|(_, value)| value.is_empty()) {
        Some((field, _)) => Err(RegistryError::InvalidInput(format!("{} cannot be empty", field))),
        None => Ok(())
    }
}

impl GuideRegistry {
    pub fn new() -> Self {
        GuideRegistry { guides: HashMap::new(), modified: false }
    }

    /// Builds a registry from previously saved guides. Loading is not a modification.
    pub fn from_guides(guides: Vec<Guide>) -> Result<Self, RegistryError> {
        let mut registry = GuideRegistry::new();
        for guide in guides {
            if let Some(field) = guide.first_empty_field() {
                return Err(RegistryError::InvalidInput(format!("{} of stored guide {} is empty", field, guide.email())));
            }
            match registry.guides.entry(guide.email().to_string()) {
                Entry::Occupied(entry) => { return Err(RegistryError::DuplicateEmail(entry.key().clone())); }
                Entry::Vacant(entry) => { entry.insert(guide); }
            }
        }
        Ok(registry)
    }

    pub fn register(&mut self, email: &str, password: &str, name: &str, emergency_contact: &str) -> Result<(), RegistryError> {
        check_not_empty(&[("email", email), ("password", password), ("name", name), ("emergency contact", emergency_contact)])?;

        if self.contains(email) {
            return Err(RegistryError::DuplicateEmail(email.to_string()));
        }

        self.guides.insert(email.to_string(), Guide::new(email.to_string(), password.to_string(), name.to_string(), emergency_contact.to_string()));
        self.modified = true;
        Ok(())
    }

    pub fn update(&mut self, email: &str, password: &str, name: &str, emergency_contact: &str) -> Result<(), RegistryError> {
        check_not_empty(&[("email", email), ("password", password), ("name", name), ("emergency contact", emergency_contact)])?;

        let guide = self.guides.get_mut(email).ok_or_else(|| RegistryError::NotFound(email.to_string()))?;
        guide.overwrite(password, name, emergency_contact);
        self.modified = true;
        Ok(())
    }

    pub fn delete(&mut self, email: &str) -> Result<(), RegistryError> {
        check_not_empty(&[("email", email)])?;

        match self.guides.remove(email) {
            Some(_) => { self.modified = true; Ok(()) }
            None => Err(RegistryError::NotFound(email.to_string()))
        }
    }

    pub fn get(&self, email: &str) -> Option<&Guide> {
        self.guides.get(email)
    }

    pub fn contains(&self, email: &str) -> bool {
        self.guides.contains_key(email)
    }

    /// All guides sorted by email.
    pub fn list(&self) -> Vec<&Guide> {
        let mut guides = self.guides.values().collect::<Vec<_>>();
        guides.sort_by(|a, b| a.email().cmp(b.email()));
        guides
    }

    pub fn len(&self) -> usize {
        self.guides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guides.is_empty()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }
}

#[cfg(test)]
fn snapshot(registry: &GuideRegistry) -> Vec<Guide> {
    registry.list().into_iter().cloned().collect()
}

#[test]
fn test_register_and_lookup() {
    let mut registry = GuideRegistry::new();
    assert!(registry.is_empty());
    assert!(!registry.contains("alice@x"));
    assert_eq!(registry.register("alice@x", "pw", "AliceSmith", "bob"), Ok(()));
    assert!(registry.contains("alice@x"));
    assert!(!registry.is_empty());
    assert_eq!(registry.len(), 1);

    let guide = registry.get("alice@x").unwrap();
    assert_eq!(guide.email(), "alice@x");
    assert_eq!(guide.password(), "pw");
    assert_eq!(guide.name(), "AliceSmith");
    assert_eq!(guide.emergency_contact(), "bob");
    assert!(registry.get("nobody").is_none());
}

#[test]
fn test_duplicate_email_leaves_registry_unchanged() {
    let mut registry = GuideRegistry::new();
    assert_eq!(registry.register("alice@x", "pw", "AliceSmith", "bob"), Ok(()));
    let before = snapshot(&registry);
    registry.mark_saved();

    assert_eq!(registry.register("alice@x", "pw2", "AliceJones", "carl"), Err(RegistryError::DuplicateEmail("alice@x".to_string())));
    assert_eq!(snapshot(&registry), before);
    assert!(!registry.is_modified());
}

#[test]
fn test_update_and_delete_missing_guide() {
    let mut registry = GuideRegistry::new();
    assert_eq!(registry.register("alice", "pw", "AliceSmith", "bob"), Ok(()));
    registry.mark_saved();
    let before = snapshot(&registry);

    assert_eq!(registry.update("ghost", "pw", "Nobody", "none"), Err(RegistryError::NotFound("ghost".to_string())));
    assert_eq!(registry.delete("ghost"), Err(RegistryError::NotFound("ghost".to_string())));
    assert_eq!(snapshot(&registry), before);
    assert!(!registry.is_modified());
}

#[test]
fn test_empty_fields_are_rejected() {
    let mut registry = GuideRegistry::new();
    assert_eq!(registry.register("alice", "pw", "AliceSmith", "bob"), Ok(()));
    let before = snapshot(&registry);

    assert_eq!(registry.register("", "pw", "Name", "bob"), Err(RegistryError::InvalidInput("email cannot be empty".to_string())));
    assert_eq!(registry.register("carol", "", "Name", "bob"), Err(RegistryError::InvalidInput("password cannot be empty".to_string())));
    assert_eq!(registry.register("carol", "pw", "", "bob"), Err(RegistryError::InvalidInput("name cannot be empty".to_string())));
    assert_eq!(registry.register("carol", "pw", "Name", ""), Err(RegistryError::InvalidInput("emergency contact cannot be empty".to_string())));
    assert_eq!(registry.update("alice", "newpw", "", "carl"), Err(RegistryError::InvalidInput("name cannot be empty".to_string())));
    assert_eq!(registry.update("alice", "newpw", "AliceJones", ""), Err(RegistryError::InvalidInput("emergency contact cannot be empty".to_string())));
    assert_eq!(registry.update("ghost", "newpw", "", "carl"), Err(RegistryError::InvalidInput("name cannot be empty".to_string())));
    registry.mark_saved();
    assert_eq!(registry.delete(""), Err(RegistryError::InvalidInput("email cannot be empty".to_string())));
    assert!(!registry.is_modified());

    // a rejected update must not leave the password changed either
    assert_eq!(snapshot(&registry), before);
    assert!(registry.get("carol").is_none());
}

#[test]
fn test_guide_lifecycle() {
    let mut registry = GuideRegistry::new();
    assert_eq!(registry.register("alice@x", "pw", "AliceSmith", "bob"), Ok(()));
    assert_eq!(registry.register("alice@x", "pw2", "AliceJones", "carl"), Err(RegistryError::DuplicateEmail("alice@x".to_string())));
    assert_eq!(registry.update("alice@x", "pw2", "AliceJones", "carl"), Ok(()));
    {
        let guide = registry.get("alice@x").unwrap();
        assert_eq!(guide.name(), "AliceJones");
        assert_eq!(guide.emergency_contact(), "carl");
        assert_eq!(guide.password(), "pw2");
        assert_eq!(guide.email(), "alice@x");
    }
    assert_eq!(registry.delete("alice@x"), Ok(()));
    assert_eq!(registry.delete("alice@x"), Err(RegistryError::NotFound("alice@x".to_string())));
    assert_eq!(registry.len(), 0);
}

#[test]
fn test_list_and_modified_flag() {
    let mut registry = GuideRegistry::new();
    assert!(!registry.is_modified());
    assert_eq!(registry.register("zoe", "pw", "ZoeLee", "ann"), Ok(()));
    assert_eq!(registry.register("adam", "pw", "AdamPark", "ben"), Ok(()));
    assert!(registry.is_modified());
    assert_eq!(registry.list().iter().map(|guide| guide.email()).collect::<Vec<_>>(), vec!["adam", "zoe"]);

    registry.mark_saved();
    assert!(!registry.is_modified());
    assert_eq!(registry.delete("zoe"), Ok(()));
    assert!(registry.is_modified());
}

#[test]
fn test_from_guides() {
    let mut source = GuideRegistry::new();
    assert_eq!(source.register("alice", "pw", "AliceSmith", "bob"), Ok(()));
    assert_eq!(source.register("carol", "pw", "CarolWhite", "dan"), Ok(()));
    let saved = snapshot(&source);

    let loaded = GuideRegistry::from_guides(saved.clone()).unwrap();
    assert_eq!(snapshot(&loaded), saved);
    assert!(!loaded.is_modified());

    let mut duplicated = saved.clone();
    duplicated.push(saved[0].clone());
    assert_eq!(GuideRegistry::from_guides(duplicated).err(), Some(RegistryError::DuplicateEmail("alice".to_string())));

    let broken = vec![Guide::new("eve".to_string(), "pw".to_string(), "".to_string(), "bob".to_string())];
    assert_eq!(GuideRegistry::from_guides(broken).err(), Some(RegistryError::InvalidInput("name of stored guide eve is empty".to_string())));
}
