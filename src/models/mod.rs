pub mod course;
pub mod item;

pub use course::{Course, CourseShell};
pub use item::{FileObject, Item, ItemKind};
