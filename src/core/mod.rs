pub mod composer;
pub mod layout;
pub mod metrics;
pub mod pdf;

pub use composer::LabelComposer;
pub use layout::LabelLayout;
