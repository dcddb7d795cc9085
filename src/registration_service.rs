use crate::guide_registry::{Guide, GuideRegistry, RegistryError};
use crate::reporting::{LogSender, log};
use crate::storage::{GuideStore, StorageError};

use tokio::sync::RwLock;

use std::sync::Arc;

pub const ONLY_LETTERS_MESSAGE: &str = "The input must only contain letters.";
pub const NOT_EMPTY_MESSAGE: &str = "The input must not be empty.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterGuideRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub emergency_contact: String
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateGuideRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub emergency_contact: String
}

/// Letters check first, then emptiness. An empty field passes the letters check.
pub fn validate_fields(fields: &[&str]) -> Result<(), RegistryError> {
    if !fields.iter().all(|field| field.chars().all(|c| c.is_ascii_alphabetic())) {
        return Err(RegistryError::InvalidInput(ONLY_LETTERS_MESSAGE.to_string()));
    }
    if fields.iter().any(|field| field.is_empty()) {
        return Err(RegistryError::InvalidInput(NOT_EMPTY_MESSAGE.to_string()));
    }
    Ok(())
}

fn error_message(error: RegistryError) -> String {
    match error {
        RegistryError::InvalidInput(message) => message,
        other => other.to_string()
    }
}

/// Gatekeeper between the presentation surface and the registry.
#[derive(Clone)]
pub struct GuideRegistrationService {
    registry: Arc<RwLock<GuideRegistry>>,
    log_sender: LogSender
}

impl GuideRegistrationService {
    pub fn new(registry: GuideRegistry, log_sender: LogSender) -> Self {
        GuideRegistrationService { registry: Arc::new(RwLock::new(registry)), log_sender: log_sender }
    }

    pub fn load(store: &dyn GuideStore, log_sender: LogSender) -> Result<Self, StorageError> {
        let registry = GuideRegistry::from_guides(store.load()?).map_err(|e| StorageError::InvalidData(e.to_string()))?;
        let loaded = registry.len();
        let service = GuideRegistrationService::new(registry, log_sender);
        service.log(log::Level::Info, format!("Loaded {} guides", loaded));
        Ok(service)
    }

    fn log(&self, level: log::Level, text: String) {
        let _ = self.log_sender.send(log::create("service", level, text));
    }

    fn report(&self, action: &str, email: &str, result: Result<(), RegistryError>) -> Result<(), String> {
        match result {
            Ok(()) => {
                self.log(log::Level::Info, format!("{} guide {}", action, email));
                Ok(())
            }
            Err(e) => {
                let message = error_message(e);
                self.log(log::Level::Error, format!("{} guide {} failed: {}", action, email, message));
                Err(message)
            }
        }
    }

    pub async fn register_guide(&self, request: RegisterGuideRequest) -> Result<(), String> {
        let name = format!("{}{}", request.first_name, request.last_name);
        let result = match validate_fields(&[name.as_str(), request.email.as_str(), request.password.as_str(), request.emergency_contact.as_str()]) {
            Err(e) => Err(e),
            Ok(()) => self.registry.write().await.register(&request.email, &request.password, &name, &request.emergency_contact)
        };
        self.report("Registered", &request.email, result)
    }

    pub async fn update_guide(&self, request: UpdateGuideRequest) -> Result<(), String> {
        let name = format!("{}{}", request.first_name, request.last_name);
        let result = match validate_fields(&[name.as_str(), request.email.as_str(), request.password.as_str(), request.emergency_contact.as_str()]) {
            Err(e) => Err(e),
            Ok(()) => self.registry.write().await.update(&request.email, &request.password, &name, &request.emergency_contact)
        };
        self.report("Updated", &request.email, result)
    }

    pub async fn delete_guide(&self, email: &str) -> Result<(), String> {
        let result = match validate_fields(&[email]) {
            Err(e) => Err(e),
            Ok(()) => self.registry.write().await.delete(email)
        };
        self.report("Deleted", email, result)
    }

    pub async fn find_guide(&self, email: &str) -> Option<Guide> {
        self.registry.read().await.get(email).cloned()
    }

    pub async fn guides(&self) -> Vec<Guide> {
        self.registry.read().await.list().into_iter().cloned().collect()
    }

    pub async fn is_empty(&self) -> bool {
        self.registry.read().await.is_empty()
    }

    pub async fn is_modified(&self) -> bool {
        self.registry.read().await.is_modified()
    }

    /// Persists the current registry. Holds the write lock across snapshot and flag reset.
    pub async fn save(&self, store: &dyn GuideStore) -> Result<(), String> {
        let mut registry = self.registry.write().await;
        let guides = registry.list().into_iter().cloned().collect::<Vec<_>>();
        match store.save(&guides) {
            Ok(()) => {
                registry.mark_saved();
                self.log(log::Level::Info, format!("Saved {} guides", guides.len()));
                Ok(())
            }
            Err(e) => {
                self.log(log::Level::Error, format!("Could not save guides: {}", e));
                Err(e.to_string())
            }
        }
    }
}

#[cfg(test)]
fn register_request(email: &str, password: &str, first_name: &str, last_name: &str, emergency_contact: &str) -> RegisterGuideRequest {
    RegisterGuideRequest { email: email.to_string(), password: password.to_string(), first_name: first_name.to_string(), last_name: last_name.to_string(), emergency_contact: emergency_contact.to_string() }
}

#[cfg(test)]
fn update_request(email: &str, password: &str, first_name: &str, last_name: &str, emergency_contact: &str) -> UpdateGuideRequest {
    UpdateGuideRequest { email: email.to_string(), password: password.to_string(), first_name: first_name.to_string(), last_name: last_name.to_string(), emergency_contact: emergency_contact.to_string() }
}

#[cfg(test)]
fn test_service() -> (GuideRegistrationService, crate::reporting::LogReceiver) {
    let (log_sender, log_receiver) = crate::reporting::channel();
    (GuideRegistrationService::new(GuideRegistry::new(), log_sender), log_receiver)
}

#[test]
fn test_validate_fields() {
    assert_eq!(validate_fields(&["alice", "pw", "AliceSmith"]), Ok(()));
    assert_eq!(validate_fields(&["alice", ""]), Err(RegistryError::InvalidInput(NOT_EMPTY_MESSAGE.to_string())));
    assert_eq!(validate_fields(&["alice smith"]), Err(RegistryError::InvalidInput(ONLY_LETTERS_MESSAGE.to_string())));
    assert_eq!(validate_fields(&["bob1"]), Err(RegistryError::InvalidInput(ONLY_LETTERS_MESSAGE.to_string())));
    // letters check runs before the emptiness check
    assert_eq!(validate_fields(&["", "x-y"]), Err(RegistryError::InvalidInput(ONLY_LETTERS_MESSAGE.to_string())));
    assert_eq!(validate_fields(&["élodie"]), Err(RegistryError::InvalidInput(ONLY_LETTERS_MESSAGE.to_string())));
}

#[tokio::test]
async fn test_register_and_find() {
    let (service, mut log_receiver) = test_service();
    assert_eq!(service.register_guide(register_request("alice", "pw", "Alice", "Smith", "bob")).await, Ok(()));

    assert!(!service.is_empty().await);
    let guide = service.find_guide("alice").await.unwrap();
    assert_eq!(guide.name(), "AliceSmith");
    assert_eq!(guide.password(), "pw");
    assert_eq!(guide.emergency_contact(), "bob");
    assert!(service.is_modified().await);

    let logged = log_receiver.recv().await.unwrap();
    assert_eq!(logged.get_level(), log::Level::Info);
    assert!(logged.to_string().ends_with("[service][Info] Registered guide alice"));
}

#[tokio::test]
async fn test_realistic_email_is_rejected() {
    // the letters-only gate also rejects '@' and '.', so real addresses never reach the registry
    let (service, _log_receiver) = test_service();
    assert_eq!(service.register_guide(register_request("alice@x.com", "pw", "Alice", "Smith", "bob")).await, Err(ONLY_LETTERS_MESSAGE.to_string()));
    assert_eq!(service.register_guide(register_request("alice", "pw", "Alice", "Smith", "5551234")).await, Err(ONLY_LETTERS_MESSAGE.to_string()));
    assert!(service.is_empty().await);
    assert!(!service.is_modified().await);
}

#[tokio::test]
async fn test_failed_operations_do_not_mutate() {
    let (service, _log_receiver) = test_service();
    assert_eq!(service.register_guide(register_request("alice", "pw", "Alice", "Smith", "bob")).await, Ok(()));
    let before = service.guides().await;

    assert_eq!(service.register_guide(register_request("alice", "other", "Alice", "Jones", "carl")).await, Err("A guide with email alice already exists".to_string()));
    assert_eq!(service.register_guide(register_request("carol", "pw", "", "", "dan")).await, Err(NOT_EMPTY_MESSAGE.to_string()));
    assert_eq!(service.update_guide(update_request("ghost", "pw", "No", "Body", "none")).await, Err("There is no guide with email ghost".to_string()));
    assert_eq!(service.update_guide(update_request("alice", "pw", "Alice", "Jones", "")).await, Err(NOT_EMPTY_MESSAGE.to_string()));
    assert_eq!(service.update_guide(update_request("alice", "pw2", "Alice", "Jones", "carl9")).await, Err(ONLY_LETTERS_MESSAGE.to_string()));
    assert_eq!(service.delete_guide("ghost").await, Err("There is no guide with email ghost".to_string()));
    assert_eq!(service.delete_guide("").await, Err(NOT_EMPTY_MESSAGE.to_string()));

    assert_eq!(service.guides().await, before);
}

#[tokio::test]
async fn test_update_then_delete() {
    let (service, _log_receiver) = test_service();
    assert_eq!(service.register_guide(register_request("alice", "pw", "Alice", "Smith", "bob")).await, Ok(()));
    assert_eq!(service.update_guide(update_request("alice", "pwtwo", "Alice", "Jones", "carl")).await, Ok(()));

    let guide = service.find_guide("alice").await.unwrap();
    assert_eq!(guide.name(), "AliceJones");
    assert_eq!(guide.emergency_contact(), "carl");
    assert_eq!(guide.password(), "pwtwo");

    assert_eq!(service.delete_guide("alice").await, Ok(()));
    assert_eq!(service.find_guide("alice").await, None);
    assert_eq!(service.delete_guide("alice").await, Err("There is no guide with email alice".to_string()));
}

#[tokio::test]
async fn test_concurrent_registrations() {
    let (service, _log_receiver) = test_service();
    let mut handles = Vec::new();
    for email in ["anna", "bert", "cara", "dave", "anna"] {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.register_guide(register_request(email, "pw", "Some", "Guide", "help")).await
        }));
    }

    let mut failures = 0;
    for handle in handles {
        if handle.await.unwrap().is_err() {
            failures += 1;
        }
    }
    assert_eq!(failures, 1);
    assert_eq!(service.guides().await.len(), 4);
}

#[tokio::test]
async fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = crate::storage::JsonFileStore::new(dir.path().join("guides.json"));
    let (service, _log_receiver) = test_service();
    assert_eq!(service.register_guide(register_request("alice", "pw", "Alice", "Smith", "bob")).await, Ok(()));
    assert_eq!(service.register_guide(register_request("carol", "pw", "Carol", "White", "dan")).await, Ok(()));

    assert_eq!(service.save(&store).await, Ok(()));
    assert!(!service.is_modified().await);

    let (log_sender, _log_receiver) = crate::reporting::channel();
    let reloaded = GuideRegistrationService::load(&store, log_sender).unwrap();
    assert_eq!(reloaded.guides().await, service.guides().await);
    assert!(!reloaded.is_modified().await);
}

#[tokio::test]
async fn test_load_rejects_duplicated_guides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("guides.json");
    let guide = r#"{"email":"alice","password":"pw","name":"AliceSmith","emergency_contact":"bob"}"#;
    std::fs::write(&path, format!("[{},{}]", guide, guide)).unwrap();

    let (log_sender, _log_receiver) = crate::reporting::channel();
    let store = crate::storage::JsonFileStore::new(path);
    assert!(matches!(GuideRegistrationService::load(&store, log_sender), Err(StorageError::InvalidData(_))));
}
