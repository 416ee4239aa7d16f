pub mod authorization;
pub mod consent;

pub use authorization::{AuthorizationOutcomeDto, AuthorizationRequestDto};
pub use consent::{ConsentChoice, ConsentInput, ConsentRecordDto};
