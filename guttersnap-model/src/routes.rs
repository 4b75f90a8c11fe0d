/// Path the browser form posts a completed photo request to.
pub const SUBMIT_REQUEST: &str = "/submit-request";

/// Landing page served from the static directory.
pub const INDEX: &str = "/";
