//! The tool's widgets: data editors, the file browser, and the manager
//! that owns them and routes commands.

pub mod data_editor;
pub mod file_browser;
pub mod quick_fill;
pub mod widget_manager;

pub use data_editor::DataEditor;
pub use file_browser::FileBrowser;
pub use widget_manager::{ActiveWidget, WidgetManager};
