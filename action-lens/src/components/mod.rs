pub mod dispatch_box;
pub mod help_bar;
pub mod inspector;
pub mod sidebar;

// Re-export core Component trait
pub use action_lens_core::Component;

pub use dispatch_box::{DispatchBox, DispatchBoxProps};
pub use help_bar::{HelpBar, HelpBarProps};
pub use inspector::Inspector;
pub use sidebar::{Sidebar, SidebarProps};
