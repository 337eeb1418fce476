//! Material entity definitions: books, DVDs and magazines.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    AuditAction, AuditEntry, AuditLog, EntityError, EntityResult, Fine, Reservable,
    ReservationState, User,
};

/// Catalog-unique identifier of a material.
pub type MaterialId = u32;

/// Kind of material. Determines the fine schedule and whether the
/// material can be reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MaterialKind {
    /// A book, fined 0.50 per day late.
    Book,
    /// A DVD, fined 1.00 per day late.
    #[serde(rename = "DVD")]
    Dvd,
    /// A magazine issue, fined 0.25 per day late.
    Magazine,
}

impl MaterialKind {
    /// All kinds, in statistics order.
    pub const ALL: [Self; 3] = [Self::Book, Self::Dvd, Self::Magazine];

    /// Converts the kind to its tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Book => "Book",
            Self::Dvd => "DVD",
            Self::Magazine => "Magazine",
        }
    }

    /// Fine charged per day late, in cents.
    pub fn daily_rate_cents(&self) -> u64 {
        match self {
            Self::Book => 50,
            Self::Dvd => 100,
            Self::Magazine => 25,
        }
    }

    /// Computes the fine for the given number of days late.
    pub fn compute_fine(&self, days_late: u32) -> Fine {
        Fine::per_day(self.daily_rate_cents(), days_late)
    }

    /// Returns true if materials of this kind accept reservations.
    pub fn is_reservable(&self) -> bool {
        matches!(self, Self::Book | Self::Dvd)
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum MaterialDetails {
    Book {
        pages: u32,
        #[serde(default)]
        reservation: ReservationState,
    },
    #[serde(rename = "DVD")]
    Dvd {
        duration_minutes: u32,
        #[serde(default)]
        reservation: ReservationState,
    },
    Magazine {
        edition: u32,
    },
}

/// The user currently holding a material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holder {
    /// Holding user's ID.
    pub user_id: Uuid,
    /// Holding user's name, kept for audit details.
    pub name: String,
}

/// A catalog item with lending state.
///
/// Availability is derived from the holder: a material is available iff
/// nobody holds it. Holder and checkout time change only through
/// [`Material::checkout`] and [`Material::return_item`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    id: MaterialId,
    title: String,
    author: String,
    year: i32,
    holder: Option<Holder>,
    checked_out_at: Option<DateTime<Utc>>,
    #[serde(default)]
    history: AuditLog,
    details: MaterialDetails,
}

impl Material {
    fn new(
        id: MaterialId,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        details: MaterialDetails,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            year,
            holder: None,
            checked_out_at: None,
            history: AuditLog::new(),
            details,
        }
    }

    /// Creates a book. Fails if `pages` is zero.
    pub fn book(
        id: MaterialId,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        pages: u32,
    ) -> EntityResult<Self> {
        let pages = positive("page count", pages)?;
        Ok(Self::new(
            id,
            title,
            author,
            year,
            MaterialDetails::Book {
                pages,
                reservation: ReservationState::new(),
            },
        ))
    }

    /// Creates a DVD. Fails if `duration_minutes` is zero.
    pub fn dvd(
        id: MaterialId,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        duration_minutes: u32,
    ) -> EntityResult<Self> {
        let duration_minutes = positive("duration", duration_minutes)?;
        Ok(Self::new(
            id,
            title,
            author,
            year,
            MaterialDetails::Dvd {
                duration_minutes,
                reservation: ReservationState::new(),
            },
        ))
    }

    /// Creates a magazine issue. Fails if `edition` is zero.
    pub fn magazine(
        id: MaterialId,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        edition: u32,
    ) -> EntityResult<Self> {
        let edition = positive("edition number", edition)?;
        Ok(Self::new(
            id,
            title,
            author,
            year,
            MaterialDetails::Magazine { edition },
        ))
    }

    pub fn id(&self) -> MaterialId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn details(&self) -> &MaterialDetails {
        &self.details
    }

    /// Returns the kind tag of this material.
    pub fn kind(&self) -> MaterialKind {
        match self.details {
            MaterialDetails::Book { .. } => MaterialKind::Book,
            MaterialDetails::Dvd { .. } => MaterialKind::Dvd,
            MaterialDetails::Magazine { .. } => MaterialKind::Magazine,
        }
    }

    /// Page count, for books.
    pub fn pages(&self) -> Option<u32> {
        match self.details {
            MaterialDetails::Book { pages, .. } => Some(pages),
            _ => None,
        }
    }

    /// Running time in minutes, for DVDs.
    pub fn duration_minutes(&self) -> Option<u32> {
        match self.details {
            MaterialDetails::Dvd {
                duration_minutes, ..
            } => Some(duration_minutes),
            _ => None,
        }
    }

    /// Running time formatted as `"2h 28min"`, for DVDs.
    pub fn formatted_duration(&self) -> Option<String> {
        self.duration_minutes()
            .map(|minutes| format!("{}h {}min", minutes / 60, minutes % 60))
    }

    /// Edition number, for magazines.
    pub fn edition(&self) -> Option<u32> {
        match self.details {
            MaterialDetails::Magazine { edition } => Some(edition),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.holder.is_none()
    }

    pub fn holder(&self) -> Option<&Holder> {
        self.holder.as_ref()
    }

    pub fn checked_out_at(&self) -> Option<DateTime<Utc>> {
        self.checked_out_at
    }

    /// Computes the fine for `days_late` using this material's schedule.
    pub fn compute_fine(&self, days_late: u32) -> Fine {
        self.kind().compute_fine(days_late)
    }

    /// Lends the material to `user`. Returns false if it is not available.
    pub fn checkout(&mut self, user: &User) -> bool {
        self.checkout_at(user, Utc::now())
    }

    /// Lends the material to `user` at an explicit time.
    pub fn checkout_at(&mut self, user: &User, at: DateTime<Utc>) -> bool {
        if !self.is_available() {
            return false;
        }
        self.holder = Some(Holder {
            user_id: user.id(),
            name: user.name().to_string(),
        });
        self.checked_out_at = Some(at);
        self.history
            .record_at(AuditAction::CheckedOut, user.name(), at);
        true
    }

    /// Takes the material back. Returns false if it was already available.
    pub fn return_item(&mut self) -> bool {
        self.return_item_at(Utc::now())
    }

    /// Takes the material back at an explicit time.
    pub fn return_item_at(&mut self, at: DateTime<Utc>) -> bool {
        let Some(holder) = self.holder.take() else {
            return false;
        };
        self.checked_out_at = None;
        self.history.record_at(AuditAction::Returned, holder.name, at);
        true
    }

    /// Returns the reservation slot for reservable kinds.
    pub fn reservation(&self) -> Option<&ReservationState> {
        match &self.details {
            MaterialDetails::Book { reservation, .. }
            | MaterialDetails::Dvd { reservation, .. } => Some(reservation),
            MaterialDetails::Magazine { .. } => None,
        }
    }

    /// Returns the reservation capability, or `None` if this kind has none.
    pub fn as_reservable_mut(&mut self) -> Option<ReservableMaterial<'_>> {
        let available = self.holder.is_none();
        match &mut self.details {
            MaterialDetails::Book { reservation, .. }
            | MaterialDetails::Dvd { reservation, .. } => Some(ReservableMaterial {
                available,
                reservation,
                history: &mut self.history,
            }),
            MaterialDetails::Magazine { .. } => None,
        }
    }

    /// Appends an entry to this material's history.
    pub fn record(&mut self, action: AuditAction, details: impl Into<String>) {
        self.history.record(action, details);
    }

    /// Returns the action history, oldest first.
    pub fn history(&self) -> &[AuditEntry] {
        self.history.history()
    }

    pub fn last_action(&self) -> Option<&AuditEntry> {
        self.history.last_action()
    }

    /// Clears the action history. Diagnostic use only.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Returns true if holder and checkout time agree with each other.
    pub fn is_consistent(&self) -> bool {
        self.holder.is_some() == self.checked_out_at.is_some()
    }

    /// Re-checks the size attribute of a material that did not come
    /// through a constructor, such as one read back from JSON.
    pub fn validate(&self) -> EntityResult<()> {
        match &self.details {
            MaterialDetails::Book { pages, .. } => positive("page count", *pages)?,
            MaterialDetails::Dvd {
                duration_minutes, ..
            } => positive("duration", *duration_minutes)?,
            MaterialDetails::Magazine { edition } => positive("edition number", *edition)?,
        };
        Ok(())
    }
}

fn positive(field: &'static str, value: u32) -> EntityResult<u32> {
    if value == 0 {
        return Err(EntityError::invalid_attribute(field, value));
    }
    Ok(value)
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.is_available() {
            "Available"
        } else {
            "On loan"
        };
        write!(
            f,
            "{}: {} by {} ({}) - {}",
            self.kind(),
            self.title,
            self.author,
            self.year,
            status
        )?;
        match &self.details {
            MaterialDetails::Book { pages, .. } => write!(f, " - {pages} pages")?,
            MaterialDetails::Dvd {
                duration_minutes, ..
            } => write!(f, " - {}h {}min", duration_minutes / 60, duration_minutes % 60)?,
            MaterialDetails::Magazine { edition } => write!(f, " - Edition #{edition}")?,
        }
        if let Some(name) = self.reservation().and_then(ReservationState::holder) {
            write!(f, " (reserved by {name})")?;
        }
        Ok(())
    }
}

/// Mutable view of a reservable material.
#[derive(Debug)]
pub struct ReservableMaterial<'a> {
    available: bool,
    reservation: &'a mut ReservationState,
    history: &'a mut AuditLog,
}

impl Reservable for ReservableMaterial<'_> {
    fn reserve(&mut self, user_name: &str) -> bool {
        if !self.available {
            return false;
        }
        self.reservation.set(user_name);
        self.history.record(AuditAction::Reserved, user_name);
        true
    }

    fn cancel_reservation(&mut self) -> bool {
        match self.reservation.take() {
            Some(previous) => {
                self.history
                    .record(AuditAction::ReservationCancelled, previous);
                true
            }
            None => false,
        }
    }

    fn reservation(&self) -> &ReservationState {
        &*self.reservation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User::new("Alice", "alice@example.com").unwrap()
    }

    #[test]
    fn test_kind_specific_fines() {
        let book = Material::book(1, "Moby Dick", "Herman Melville", 1851, 635).unwrap();
        let dvd = Material::dvd(2, "Inception", "Christopher Nolan", 2010, 148).unwrap();
        let magazine = Material::magazine(3, "Time", "Various", 2023, 125).unwrap();

        assert_eq!(book.compute_fine(10).to_string(), "5.00");
        assert_eq!(dvd.compute_fine(10).to_string(), "10.00");
        assert_eq!(magazine.compute_fine(10).to_string(), "2.50");
    }

    #[test]
    fn test_fine_is_monotonic_and_zero_at_zero() {
        for kind in MaterialKind::ALL {
            assert_eq!(kind.compute_fine(0), Fine::ZERO);
            let mut previous = Fine::ZERO;
            for days in 0..60 {
                let fine = kind.compute_fine(days);
                assert!(previous <= fine);
                previous = fine;
            }
        }
    }

    #[test]
    fn test_non_positive_attributes_rejected() {
        assert_eq!(
            Material::dvd(1, "Empty", "Nobody", 2020, 0).unwrap_err(),
            EntityError::invalid_attribute("duration", 0u32)
        );
        assert!(matches!(
            Material::book(1, "Empty", "Nobody", 2020, 0),
            Err(EntityError::InvalidAttribute { field: "page count", .. })
        ));
        assert!(matches!(
            Material::magazine(1, "Empty", "Nobody", 2020, 0),
            Err(EntityError::InvalidAttribute { field: "edition number", .. })
        ));
    }

    #[test]
    fn test_validate_catches_deserialized_zero_attribute() {
        let book = Material::book(1, "1984", "George Orwell", 1949, 328).unwrap();
        assert!(book.validate().is_ok());

        let json = serde_json::to_string(&book)
            .unwrap()
            .replace("\"pages\":328", "\"pages\":0");
        let zeroed: Material = serde_json::from_str(&json).unwrap();
        assert_eq!(zeroed.pages(), Some(0));
        assert_eq!(
            zeroed.validate().unwrap_err(),
            EntityError::invalid_attribute("page count", 0u32)
        );
    }

    #[test]
    fn test_checkout_and_return_transitions() {
        let user = alice();
        let mut book = Material::book(1, "1984", "George Orwell", 1949, 328).unwrap();
        assert!(book.is_available());

        assert!(book.checkout(&user));
        assert!(!book.is_available());
        assert_eq!(book.holder().unwrap().name, "Alice");
        assert!(book.checked_out_at().is_some());
        assert!(book.is_consistent());

        // Second checkout is a no-op.
        assert!(!book.checkout(&user));
        assert_eq!(book.history().len(), 1);

        assert!(book.return_item());
        assert!(book.is_available());
        assert!(book.holder().is_none());
        assert!(book.checked_out_at().is_none());
        assert!(!book.return_item());

        let last = book.last_action().unwrap();
        assert_eq!(last.action, AuditAction::Returned);
        assert_eq!(last.details, "Alice");
    }

    #[test]
    fn test_magazine_is_not_reservable() {
        let mut magazine = Material::magazine(9, "National Geographic", "Various", 2023, 200).unwrap();
        assert!(magazine.as_reservable_mut().is_none());
        assert!(magazine.reservation().is_none());
        assert!(!magazine.kind().is_reservable());
    }

    #[test]
    fn test_reserve_only_while_available() {
        let user = alice();
        let mut book = Material::book(1, "1984", "George Orwell", 1949, 328).unwrap();
        book.checkout(&user);

        let mut reservable = book.as_reservable_mut().unwrap();
        assert!(!reservable.reserve("Bob"));
        assert!(!reservable.is_reserved());

        let mut dvd = Material::dvd(5, "Inception", "Christopher Nolan", 2010, 148).unwrap();
        let mut reservable = dvd.as_reservable_mut().unwrap();
        assert!(reservable.reserve("Bob"));
        assert!(reservable.is_reserved());
        assert_eq!(reservable.reservation_holder(), Some("Bob"));
    }

    #[test]
    fn test_reserve_overwrites_existing_holder() {
        let mut dvd = Material::dvd(5, "Inception", "Christopher Nolan", 2010, 148).unwrap();
        let mut reservable = dvd.as_reservable_mut().unwrap();
        assert!(reservable.reserve("Bob"));
        assert!(reservable.reserve("Carlos"));
        assert_eq!(reservable.reservation_holder(), Some("Carlos"));
    }

    #[test]
    fn test_cancel_reservation() {
        let mut book = Material::book(1, "1984", "George Orwell", 1949, 328).unwrap();
        let mut reservable = book.as_reservable_mut().unwrap();
        assert!(!reservable.cancel_reservation());

        reservable.reserve("Bob");
        assert!(reservable.cancel_reservation());
        assert!(!reservable.is_reserved());

        let last = book.last_action().unwrap();
        assert_eq!(last.action, AuditAction::ReservationCancelled);
        assert_eq!(last.details, "Bob");
    }

    #[test]
    fn test_reservation_survives_checkout() {
        let user = alice();
        let mut book = Material::book(1, "1984", "George Orwell", 1949, 328).unwrap();
        book.as_reservable_mut().unwrap().reserve("Alice");
        book.checkout(&user);

        assert!(book.reservation().unwrap().is_reserved());
    }

    #[test]
    fn test_history_order_across_lifecycle() {
        let user = alice();
        let mut dvd = Material::dvd(5, "Inception", "Christopher Nolan", 2010, 148).unwrap();
        {
            let mut reservable = dvd.as_reservable_mut().unwrap();
            reservable.reserve("Alice");
            reservable.cancel_reservation();
        }
        dvd.checkout(&user);
        dvd.return_item();

        let actions: Vec<_> = dvd.history().iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![
                AuditAction::Reserved,
                AuditAction::ReservationCancelled,
                AuditAction::CheckedOut,
                AuditAction::Returned,
            ]
        );
    }

    #[test]
    fn test_display_and_accessors() {
        let mut dvd = Material::dvd(5, "Inception", "Christopher Nolan", 2010, 148).unwrap();
        assert_eq!(dvd.formatted_duration().as_deref(), Some("2h 28min"));
        assert_eq!(dvd.pages(), None);

        dvd.as_reservable_mut().unwrap().reserve("Bob");
        assert_eq!(
            dvd.to_string(),
            "DVD: Inception by Christopher Nolan (2010) - Available - 2h 28min (reserved by Bob)"
        );

        let magazine = Material::magazine(10, "Time", "Various", 2023, 125).unwrap();
        assert_eq!(magazine.edition(), Some(125));
        assert_eq!(
            magazine.to_string(),
            "Magazine: Time by Various (2023) - Available - Edition #125"
        );
    }

    #[test]
    fn test_kind_tags() {
        for kind in MaterialKind::ALL {
            let tag = serde_json::to_string(&kind).unwrap();
            assert_eq!(tag, format!("\"{kind}\""));
        }
        assert!(serde_json::from_str::<MaterialKind>("\"Vinyl\"").is_err());
        assert_eq!(serde_json::to_string(&MaterialKind::Dvd).unwrap(), "\"DVD\"");
    }
}
