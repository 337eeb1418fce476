//! Loan entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Fine, Material, MaterialId, MaterialKind, User};

/// Default loan period in days.
pub const DEFAULT_LOAN_LIMIT_DAYS: u32 = 14;

/// One borrow transaction.
///
/// A loan is active until [`Loan::close`] stamps its return time. While
/// active, the referenced material is on loan and listed in the user's
/// held set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    id: Uuid,
    material_id: MaterialId,
    material_kind: MaterialKind,
    user_id: Uuid,
    user_name: String,
    borrowed_at: DateTime<Utc>,
    returned_at: Option<DateTime<Utc>>,
    limit_days: u32,
}

impl Loan {
    /// Opens a loan now and registers the material in the user's held set.
    pub fn open(material: &Material, user: &mut User, limit_days: u32) -> Self {
        Self::open_at(material, user, limit_days, Utc::now())
    }

    /// Opens a loan at an explicit time.
    pub fn open_at(
        material: &Material,
        user: &mut User,
        limit_days: u32,
        borrowed_at: DateTime<Utc>,
    ) -> Self {
        user.add_loan(material);
        Self {
            id: Uuid::new_v4(),
            material_id: material.id(),
            material_kind: material.kind(),
            user_id: user.id(),
            user_name: user.name().to_string(),
            borrowed_at,
            returned_at: None,
            limit_days,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn material_id(&self) -> MaterialId {
        self.material_id
    }

    pub fn material_kind(&self) -> MaterialKind {
        self.material_kind
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn borrowed_at(&self) -> DateTime<Utc> {
        self.borrowed_at
    }

    pub fn returned_at(&self) -> Option<DateTime<Utc>> {
        self.returned_at
    }

    pub fn limit_days(&self) -> u32 {
        self.limit_days
    }

    /// Returns true until the loan is closed.
    pub fn is_active(&self) -> bool {
        self.returned_at.is_none()
    }

    /// Due date derived from the borrow time and the loan limit.
    pub fn due_at(&self) -> DateTime<Utc> {
        self.borrowed_at + chrono::Duration::days(i64::from(self.limit_days))
    }

    /// Whole days past the limit, measured to the return time once
    /// returned and to the current time otherwise.
    pub fn days_late(&self) -> u32 {
        self.days_late_at(Utc::now())
    }

    /// Like [`Loan::days_late`] with `now` standing in for the current time.
    pub fn days_late_at(&self, now: DateTime<Utc>) -> u32 {
        let end = self.returned_at.unwrap_or(now);
        let late = whole_days(self.borrowed_at, end) - i64::from(self.limit_days);
        u32::try_from(late.max(0)).unwrap_or(u32::MAX)
    }

    /// Days left before the limit, negative when overdue.
    ///
    /// Always measured against the current time, even after return.
    pub fn days_remaining(&self) -> i64 {
        self.days_remaining_at(Utc::now())
    }

    pub fn days_remaining_at(&self, now: DateTime<Utc>) -> i64 {
        i64::from(self.limit_days) - whole_days(self.borrowed_at, now)
    }

    pub fn is_overdue(&self) -> bool {
        self.days_late() > 0
    }

    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        self.days_late_at(now) > 0
    }

    /// Fine owed, using the material kind's daily rate.
    pub fn compute_fine(&self) -> Fine {
        self.material_kind.compute_fine(self.days_late())
    }

    pub fn compute_fine_at(&self, now: DateTime<Utc>) -> Fine {
        self.material_kind.compute_fine(self.days_late_at(now))
    }

    /// Closes the loan now. See [`Loan::close_at`].
    pub fn close(&mut self, material: &mut Material, user: &mut User) -> bool {
        self.close_at(material, user, Utc::now())
    }

    /// Stamps the return time, drops the material from the user's held set
    /// and runs the material's return transition.
    ///
    /// Returns the result of the material transition.
    pub fn close_at(&mut self, material: &mut Material, user: &mut User, at: DateTime<Utc>) -> bool {
        self.returned_at = Some(at);
        user.remove_loan(material.id());
        material.return_item_at(at)
    }
}

fn whole_days(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_days().abs()
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn setup() -> (Material, User) {
        let material = Material::book(1, "El Quijote", "Miguel de Cervantes", 1605, 863).unwrap();
        let user = User::new("Alice", "alice@example.com").unwrap();
        (material, user)
    }

    #[test]
    fn test_open_registers_with_user() {
        let (material, mut user) = setup();
        let loan = Loan::open(&material, &mut user, DEFAULT_LOAN_LIMIT_DAYS);

        assert!(user.holds(1));
        assert!(loan.is_active());
        assert_eq!(loan.user_name(), "Alice");
        assert_eq!(loan.limit_days(), 14);
        assert_eq!(loan.material_kind(), MaterialKind::Book);
    }

    #[test]
    fn test_days_late_and_remaining_on_active_loan() {
        let (material, mut user) = setup();
        let now = Utc::now();
        let loan = Loan::open_at(&material, &mut user, 14, now - Duration::days(24));

        assert_eq!(loan.days_late_at(now), 10);
        assert_eq!(loan.days_remaining_at(now), -10);
        assert!(loan.is_overdue_at(now));
        assert_eq!(loan.compute_fine_at(now).to_string(), "5.00");

        let early = now - Duration::days(20);
        assert_eq!(loan.days_late_at(early), 0);
        assert_eq!(loan.days_remaining_at(early), 10);
        assert!(!loan.is_overdue_at(early));
        assert_eq!(loan.compute_fine_at(early), Fine::ZERO);
    }

    #[test]
    fn test_days_late_grows_with_time() {
        let (material, mut user) = setup();
        let start = Utc::now();
        let loan = Loan::open_at(&material, &mut user, 14, start);

        let mut previous = 0;
        for day in 0..40 {
            let late = loan.days_late_at(start + Duration::days(day));
            assert!(late >= previous);
            previous = late;
        }
        assert_eq!(previous, 25);
    }

    #[test]
    fn test_closed_loan_uses_return_time_for_lateness() {
        let (mut material, mut user) = setup();
        let start = Utc::now() - Duration::days(30);
        material.checkout_at(&user, start);
        let mut loan = Loan::open_at(&material, &mut user, 14, start);

        assert!(loan.close_at(&mut material, &mut user, start + Duration::days(17)));
        assert!(!loan.is_active());
        assert!(material.is_available());
        assert!(!user.holds(1));

        // Lateness is frozen at return; remaining days keep counting to now.
        assert_eq!(loan.days_late(), 3);
        assert_eq!(loan.days_late_at(Utc::now() + Duration::days(100)), 3);
        assert_eq!(loan.days_remaining(), -16);
    }

    #[test]
    fn test_close_on_available_material_reports_false() {
        let (mut material, mut user) = setup();
        let mut loan = Loan::open(&material, &mut user, 14);

        assert!(!loan.close(&mut material, &mut user));
        assert!(loan.returned_at().is_some());
        assert_eq!(user.held_count(), 0);
    }

    #[test]
    fn test_due_at() {
        let (material, mut user) = setup();
        let start = Utc::now();
        let loan = Loan::open_at(&material, &mut user, 7, start);
        assert_eq!(loan.due_at(), start + Duration::days(7));
    }
}
