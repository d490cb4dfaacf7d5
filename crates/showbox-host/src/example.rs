use showbox_engine::input::Button;
use showbox_script::ScriptError;
use thiserror::Error;

use crate::facade::HostFacade;
use crate::painter::Painter;

/// Failure raised by an example's constructor or one of its hooks.
#[derive(Debug, Error)]
pub enum ExampleError {
    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error("{0}")]
    Failed(String),
}

/// Options passed through to every example constructor.
#[derive(Debug, Clone, Default)]
pub struct ExampleOptions {
    /// The host window is fullscreen.
    pub fullscreen: bool,
}

/// A running example. Every callback defaults to a no-op.
pub trait Example {
    /// Text shown after the host title in the window caption.
    fn caption(&self) -> String {
        String::new()
    }

    fn update(&mut self, facade: &mut HostFacade) -> Result<(), ExampleError> {
        let _ = facade;
        Ok(())
    }

    fn draw(&mut self, facade: &mut HostFacade, painter: &mut Painter<'_>) -> Result<(), ExampleError> {
        let _ = (facade, painter);
        Ok(())
    }

    fn button_down(&mut self, id: Button, facade: &mut HostFacade) -> Result<(), ExampleError> {
        let _ = (id, facade);
        Ok(())
    }

    fn button_up(&mut self, id: Button, facade: &mut HostFacade) -> Result<(), ExampleError> {
        let _ = (id, facade);
        Ok(())
    }
}

/// Constructs instances of one example type. This is what the registry stores.
pub trait ExampleFactory {
    /// Name of the declared type; unique within its source file.
    fn type_name(&self) -> &str;

    /// Caption declared before any instance exists; may be empty.
    fn declared_caption(&self) -> &str {
        ""
    }

    /// Text of the source file the type was loaded from, for the source view.
    fn source(&self) -> Option<&str> {
        None
    }

    fn instantiate(
        &self,
        width: f32,
        height: f32,
        options: &ExampleOptions,
        facade: &mut HostFacade,
    ) -> Result<Box<dyn Example>, ExampleError>;
}
