/// Router Module Index
///
/// Organizes the gateway's routes by the access class the guard assigns to
/// them. The guard itself is applied once, over the merged router, in
/// `create_router`; these modules only declare which handlers live where.

/// Routes open to anonymous callers: landing/auth pages and the auth API.
pub mod public;

/// Dashboard pages open to any authenticated role.
pub mod dashboard;

/// Moderator panel pages and API (moderator or admin).
pub mod moderator;

/// Admin panel pages and API (admin only).
pub mod admin;
