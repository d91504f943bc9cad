// Базовые модули
pub mod consts;
pub mod config;
pub mod error;
pub mod metrics;

// Кодеки: скаляры static-области и запись dynamic blob
pub mod codec;
pub mod blob;

pub mod registry;
pub mod layout;

// Носители (trait Medium + file/mem реализации) и lock-файл образа
pub mod medium;
pub mod lock;

pub mod store; // src/store/{mod,core,statics,dynamic,shared}.rs

// Удобные реэкспорты
pub use codec::{ScalarValue, StaticValue, ValueKind};
pub use config::{BlobAnchor, StoreBuilder, StoreConfig};
pub use error::{Result, StoreError};
pub use layout::{Layout, LayoutEntry};
pub use medium::{FileMedium, MemMedium, Medium};
pub use registry::StaticEntry;
pub use store::{NvStore, SharedStore, Usage};
