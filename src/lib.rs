pub mod nav;

pub use nav::{
    Child, ContextRegistry, ControllerId, LifecycleNode, LifecycleState, ModalResult, ModalStatus,
    NavCommand, NavEvent, NavigationController, Screen, ScreenContext, ScreenId,
};
