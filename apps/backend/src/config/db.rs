use super::{env_lookup, parse_var};
use crate::error::AppError;

/// Which persistence backend to run against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    /// SeaORM over Postgres (or any URL SeaORM accepts).
    Postgres { url: String },
    /// In-process store; nothing survives a restart.
    Memory,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub kind: StoreKind,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = lookup("STORE").unwrap_or_else(|| "postgres".to_string());
        let kind = match store.trim().to_ascii_lowercase().as_str() {
            "memory" => StoreKind::Memory,
            "postgres" | "" => StoreKind::Postgres {
                url: db_url(&lookup)?,
            },
            other => {
                return Err(AppError::config(format!(
                    "STORE must be 'postgres' or 'memory', got '{other}'"
                )))
            }
        };
        Ok(Self { kind })
    }

    pub fn label(&self) -> &'static str {
        match self.kind {
            StoreKind::Postgres { .. } => "postgres",
            StoreKind::Memory => "memory",
        }
    }
}

/// `DATABASE_URL` wins; otherwise assembled from the POSTGRES_* parts.
pub fn db_url<F>(lookup: &F) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()) {
        return Ok(url);
    }

    let host = lookup("POSTGRES_HOST").unwrap_or_else(|| "localhost".to_string());
    let port = parse_var(lookup, "POSTGRES_PORT", 5432u16)?;
    let db_name = must_var(lookup, "POSTGRES_DB")?;
    let username = must_var(lookup, "POSTGRES_USER")?;
    let password = must_var(lookup, "POSTGRES_PASSWORD")?;

    Ok(format!(
        "postgresql://{username}:{password}@{host}:{port}/{db_name}"
    ))
}

fn must_var<F>(lookup: &F, name: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .ok_or_else(|| AppError::config(format!("Required environment variable '{name}' is not set")))
}
