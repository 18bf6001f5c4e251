//!
//! Membership records: domain model, facade and listing projection.

/// Listing projection over the enrollment event log
pub mod projection;
/// The domain facade composing credential, builder, client and projection
pub mod service;
/// Domain types and the service error taxonomy
pub mod types;

pub use service::MembershipService;
pub use types::{
	AttendanceReceipt, EnrollReceipt, ErrorKind, FeeUpdateReceipt, ListingEntry, Member, Rank,
	ServiceError,
};
