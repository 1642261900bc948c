//! The URI paths the REST API is served on.

/// Register a new user.
pub const REGISTER: &str = "/api/auth/register";
/// Sign in with an email and password.
pub const LOG_IN: &str = "/api/auth/login";
/// Exchange a refresh token for a new token pair.
pub const REFRESH: &str = "/api/auth/refresh";
/// Read the authenticated user's profile.
pub const USER: &str = "/api/auth/user";
/// Update the authenticated user's name or email.
pub const PROFILE: &str = "/api/auth/profile";
/// List, create, or clear the authenticated user's transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The authenticated user's financial summary.
pub const SUMMARY: &str = "/api/transactions/summary";
/// Update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{id}";
/// List categories or create a custom category.
pub const CATEGORIES: &str = "/api/categories";
/// Update or delete a custom category.
pub const CATEGORY: &str = "/api/categories/{id}";
/// Read or update the authenticated user's settings.
pub const SETTINGS: &str = "/api/user/settings";
