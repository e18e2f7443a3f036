pub mod ext;
pub mod registry;
pub mod service;
pub mod traits;

pub use ext::RouterExt;
pub use registry::RegistryRouter;
pub use service::RouterService;
pub use traits::Router;
