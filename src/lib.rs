//*** START FILE: src/lib.rs ***//

// Declare all modules that are part of this library
pub mod config;
pub mod error;
pub mod logging;
pub mod color {
    pub mod convert;
    pub mod table;
}
pub mod form;
pub mod url_builder;
pub mod counter;
pub mod generator {
    pub mod document;
    pub mod uid;
    pub mod builder;
}
pub mod submit;
pub mod gui {
    pub mod app;
}

pub use color::convert::hex_to_rgba;
pub use error::{Error, Result};
pub use url_builder::sanitize_url_segment;

//*** END FILE: src/lib.rs ***//
