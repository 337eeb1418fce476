//! User-related entity definitions.

use std::{fmt, sync::LazyLock};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EntityError, EntityResult, Material, MaterialId};

/// Address grammar: dot-atom local part, hostname labels, at least one dot
/// in the domain.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("regex pattern is valid")
});

const MAX_LOCAL_PART_LEN: usize = 64;
const MAX_EMAIL_LEN: usize = 254;

/// Checks an email address against the accepted grammar.
pub fn validate_email(email: &str) -> EntityResult<()> {
    let local_len = email.find('@').unwrap_or(email.len());
    if email.len() > MAX_EMAIL_LEN || local_len > MAX_LOCAL_PART_LEN || !EMAIL_RE.is_match(email)
    {
        return Err(EntityError::invalid_email(email));
    }
    Ok(())
}

/// A registered library user.
///
/// The name is the lookup key within a catalog but is not unique; the
/// `id` disambiguates users with equal names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: Uuid,
    name: String,
    email: String,
    registered_at: DateTime<Utc>,
    held_materials: Vec<MaterialId>,
}

impl User {
    /// Creates a new user. Fails if the email is malformed.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> EntityResult<Self> {
        let email = email.into();
        validate_email(&email)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email,
            registered_at: Utc::now(),
            held_materials: Vec::new(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Replaces the email. On failure the previous address is kept.
    pub fn set_email(&mut self, email: impl Into<String>) -> EntityResult<()> {
        let email = email.into();
        validate_email(&email)?;
        self.email = email;
        Ok(())
    }

    /// IDs of the materials currently held, in borrow order.
    pub fn held_materials(&self) -> &[MaterialId] {
        &self.held_materials
    }

    pub fn held_count(&self) -> usize {
        self.held_materials.len()
    }

    pub fn holds(&self, material_id: MaterialId) -> bool {
        self.held_materials.contains(&material_id)
    }

    /// Adds a material to the held set.
    pub fn add_loan(&mut self, material: &Material) {
        if !self.holds(material.id()) {
            self.held_materials.push(material.id());
        }
    }

    /// Removes a material from the held set. Absent IDs are ignored.
    pub fn remove_loan(&mut self, material_id: MaterialId) {
        if let Some(pos) = self.held_materials.iter().position(|id| *id == material_id) {
            self.held_materials.remove(pos);
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User: {}, Email: {}, Materials on loan: {}",
            self.name,
            self.email,
            self.held_count()
        )
    }
}
