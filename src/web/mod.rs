pub mod authoring;
pub mod data;
pub mod flash;
pub mod landing;
pub mod models;
pub mod router;
pub mod schema;
pub mod state;
pub mod submission;
pub mod summary;
pub mod templates;

pub use flash::{Flash, FlashLevel};
pub use models::{AnswerRow, AnswerValue, FormRow, QuestionRow, QuestionType, ResponseRow};
pub use state::AppState;
pub use templates::{escape_html, render_footer};
