//! Users and authentication payloads of the backend API.

use serde::{Deserialize, Serialize};

use crate::{AtlasError, AtlasResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl User {
    /// Single-letter avatar shown in the sidebar.
    pub fn initial(&self) -> char {
        self.first_name
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('U')
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> AtlasResult<()> {
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    /// Validate the form, including the password confirmation which is never
    /// sent to the server.
    pub fn validate(&self, confirm_password: &str) -> AtlasResult<()> {
        if self.first_name.trim().chars().count() < 2 {
            return Err(AtlasError::validation("firstName", "Minimum 2 caractères"));
        }
        if self.last_name.trim().chars().count() < 2 {
            return Err(AtlasError::validation("lastName", "Minimum 2 caractères"));
        }
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        if self.password != confirm_password {
            return Err(AtlasError::validation(
                "confirmPassword",
                "Les mots de passe ne correspondent pas",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OtpRequest {
    pub email: String,
    pub otp: String,
}

impl OtpRequest {
    pub fn validate(&self) -> AtlasResult<()> {
        validate_email(&self.email)?;
        if self.otp.trim().is_empty() {
            return Err(AtlasError::validation("otp", "Code invalide"));
        }
        Ok(())
    }
}

fn validate_email(email: &str) -> AtlasResult<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !email.chars().any(char::is_whitespace)
                && !domain.contains('@')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AtlasError::validation("email", "Email invalide"))
    }
}

fn validate_password(password: &str) -> AtlasResult<()> {
    if password.chars().count() < 6 {
        return Err(AtlasError::validation("password", "Minimum 6 caractères"));
    }
    Ok(())
}
