use chrono::{DateTime, Utc};

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

type Timestamp = i64;

#[derive(Debug, Eq, PartialEq, PartialOrd, Ord, Clone, Copy)]
pub enum Level {
    Debug,
    Info,
    Error
}

impl FromStr for Level {
    type Err = String;

    fn from_str(level: &str) -> Result<Self, Self::Err> {
        match level {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "error" => Ok(Level::Error),
            invalid => Err(format!("Invalid logging level: {}. Available: debug, info, error", invalid))
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
pub struct Log {
    timestamp: Timestamp,
    module: String,
    level: Level,
    content: String
}

impl Log {
    pub fn get_level(&self) -> Level {
        self.level
    }
}

impl fmt::Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::from_timestamp_micros(self.timestamp) {
            Some(datetime) => {
                write!(f, "[{}][{}][{:?}] {}", datetime.to_rfc3339(), self.module, self.level, self.content)
            }
            None => Err(fmt::Error{})
        }
    }
}

impl PartialOrd for Log {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Log {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp.cmp(&other.timestamp)
    }
}

pub fn create(module: &str, level: Level, content: String) -> Log {
    Log { timestamp: Utc::now().timestamp_micros(), module: module.to_string(), level: level, content: content }
}

#[test]
fn test_log() {
    {
        let first = create("registry", Level::Error, "something happened".to_string());
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = create("service", Level::Info, "guide registered".to_string());
        assert!(first < second);
        assert!(second.to_string().ends_with("[service][Info] guide registered"));
        assert_eq!(second.get_level(), Level::Info);
        assert!(create("", Level::Debug, "no module".to_string()).to_string().ends_with("][][Debug] no module"));
    }
    {
        let log = format!("{}", create("main", Level::Info, "Something normal".to_string()));
        assert!(log.ends_with("][main][Info] Something normal"));
        let time_when_log_created = Utc::now();
        let log = format!("{}", create("cli", Level::Error, "Something is no yes".to_string()));
        let (stamp, rest) = log.split_at(log.find("][").unwrap() + 1);
        assert_eq!(rest, "[cli][Error] Something is no yes");

        let parsed_datetime = DateTime::parse_from_rfc3339(&stamp[1..stamp.len() - 1]);
        assert!(parsed_datetime.is_ok());
        assert!((parsed_datetime.unwrap().timestamp() - time_when_log_created.timestamp()).abs() <= 1);
    }
}

#[test]
fn test_level() {
    assert_eq!("debug".parse::<Level>(), Ok(Level::Debug));
    assert_eq!("info".parse::<Level>(), Ok(Level::Info));
    assert_eq!("error".parse::<Level>(), Ok(Level::Error));
    assert_eq!("loud".parse::<Level>(), Err("Invalid logging level: loud. Available: debug, info, error".to_string()));
    assert!(Level::Debug < Level::Info);
    assert!(Level::Info < Level::Error);
}
