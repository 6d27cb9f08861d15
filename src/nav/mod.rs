pub mod command;
pub mod context;
pub mod controller;
pub mod element;
pub mod lifecycle;
pub mod modal;
pub mod scheduler;
pub mod screen;
pub mod stack;
pub mod style;

pub use command::{NavCommand, NavEvent, NavigateKind};
pub use context::{ContextRegistry, ControllerId, ScreenContext};
pub use controller::{NavigationController, NOT_FOUND_SCREEN};
pub use element::{Child, OwnedNode, TabbedView};
pub use lifecycle::{LifecycleNode, LifecycleState};
pub use modal::{ModalEntry, ModalResult, ModalStack, ModalStatus, MODAL_RESULT_KEY};
pub use scheduler::{Deferred, TickQueue};
pub use screen::{Screen, ScreenId};
pub use stack::NavigationStack;
pub use style::{StyleClasses, Styleable, Visual};
