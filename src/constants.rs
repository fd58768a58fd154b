/// Renewals this many days out (or already lapsed) count as upcoming
pub const UPCOMING_RENEWAL_WINDOW_DAYS: i64 = 7;

/// Share of optional monthly spend reported as potential savings
pub const POTENTIAL_SAVINGS_RATE: f64 = 0.3;

/// Lower-cased service-name fragments that mark a subscription as necessary
pub const NECESSARY_KEYWORDS: &[&str] = &[
    "netflix",
    "spotify",
    "internet",
    "phone",
    "electricity",
    "water",
    "insurance",
    "bank",
    "credit card",
    "mortgage",
    "rent",
];

/// Identity token lifetime (15 minutes)
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 900;

pub const DEFAULT_LLM_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// Timeout for a single language-model request
pub const LLM_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const MAX_SERVICE_NAME_LEN: usize = 100;
pub const MAX_NOTES_LEN: usize = 1000;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Instruction sent ahead of the flattened subscription list
pub const CATEGORIZATION_PROMPT: &str = "Take this information, it contains various subscription \
services listed out, it has the structure of id, service_name, cost, billing_cycle and many \
subscriptions like this. Analyse these services and categorise them into optional or necessary. \
Give the output in a very specific format, your output should only contain these three things, \
system note: do not include anything extra in the output, if you feel confused use your best \
assumptions but never say anything more in output. like optional: (id of optional services here). \
necessary: (id of necessary services here). Optional improvements: (Optional improvements that \
can be made to save money or reduce carbon footprint). Here is the service list: ";

// =============================================================================
// Error Messages
// =============================================================================

pub const ERR_INVALID_EMAIL: &str = "Invalid email address";

pub const ERR_PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";

pub const ERR_INVALID_SERVICE_NAME: &str = "Service name must be between 1 and 100 characters";

pub const ERR_INVALID_COST: &str = "Cost must be a positive number";

pub const ERR_NOTES_TOO_LONG: &str = "Notes must be at most 1000 characters";

pub const ERR_MISSING_SUBSCRIPTION_ID: &str = "Subscription id is required";

pub const ERR_UNKNOWN_OWNER: &str = "Owner email does not belong to a registered user";
