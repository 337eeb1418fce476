//! Reservation capability for Book and DVD materials.

use serde::{Deserialize, Serialize};

/// Who, if anyone, has reserved a material.
///
/// Independent of availability: an item may be reserved while it is on
/// loan (reservations are only placed while available, but a later
/// checkout does not clear them).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationState {
    holder: Option<String>,
}

impl ReservationState {
    /// Creates an empty reservation slot.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_reserved(&self) -> bool {
        self.holder.is_some()
    }

    pub fn holder(&self) -> Option<&str> {
        self.holder.as_deref()
    }

    pub(crate) fn set(&mut self, user_name: impl Into<String>) {
        self.holder = Some(user_name.into());
    }

    pub(crate) fn take(&mut self) -> Option<String> {
        self.holder.take()
    }
}

/// Capability implemented by materials that accept reservations.
///
/// Obtained from a [`Material`](crate::Material) through
/// [`Material::as_reservable_mut`](crate::Material::as_reservable_mut),
/// which yields `None` for kinds without the capability.
pub trait Reservable {
    /// Places a reservation. Succeeds only while the material is available.
    ///
    /// An existing reservation held by someone else is overwritten.
    fn reserve(&mut self, user_name: &str) -> bool;

    /// Withdraws the current reservation, if there is one.
    fn cancel_reservation(&mut self) -> bool;

    /// Returns the current reservation slot.
    fn reservation(&self) -> &ReservationState;

    /// Returns true if someone holds a reservation.
    fn is_reserved(&self) -> bool {
        self.reservation().is_reserved()
    }

    /// Returns the name of the reserving user.
    fn reservation_holder(&self) -> Option<&str> {
        self.reservation().holder()
    }
}
