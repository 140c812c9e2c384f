/// Role carried by administrators; required to change a report's status
pub const ROLE_ADMIN: &str = "admin";

/// Role carried by every registered user
pub const ROLE_CITIZEN: &str = "citizen";
