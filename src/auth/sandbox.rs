//! Sandboxed execution of the server's index-derivation module.
//!
//! The exchange ships the character-position derivation as a compiled
//! WebAssembly module rather than documenting the algorithm; the client is
//! not supposed to re-derive it statically. This module embeds that binary
//! and runs it inside a `wasmtime` instance, exposed as the narrow
//! capability [`Sandbox::call`]: five named functions, five `i32`
//! arguments, one `i32` result.
//!
//! The module imports nothing and touches no linear memory; every call is
//! CPU-only and returns in microseconds. Instances are not safe for
//! concurrent entry, so a [`Sandbox`] requires `&mut self` — callers
//! serialize access (the token parser is driven from the auth manager's
//! single-flight section only).

use wasmtime::{Engine, Instance, Module, Store};

use crate::error::{Error, Result};

/// The index-derivation module, bundled at compile time.
///
/// Exports `cdx`, `rdx`, `bdx`, `ndx`, `mdx`, each
/// `(i32, i32, i32, i32, i32) -> i32`.
static MODULE_BYTES: &[u8] = include_bytes!("../../assets/tokenidx.wasm");

/// One instantiated copy of the index-derivation module.
///
/// Owned exclusively by a token parser; never shared across managers.
pub struct Sandbox {
    store: Store<()>,
    instance: Option<Instance>,
}

impl Sandbox {
    /// Compiles and instantiates the bundled module.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxInit`](crate::error::ErrorKind::SandboxInit) if
    /// compilation or instantiation fails. This is fatal for the owning
    /// manager: without the module there is no way to decode tokens.
    pub fn new() -> Result<Self> {
        let engine = Engine::default();
        let module = Module::new(&engine, MODULE_BYTES).map_err(Error::sandbox_init)?;
        let mut store = Store::new(&engine, ());
        let instance = Instance::new(&mut store, &module, &[]).map_err(Error::sandbox_init)?;

        Ok(Self {
            store,
            instance: Some(instance),
        })
    }

    /// Calls one of the module's exported functions.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxCall`](crate::error::ErrorKind::SandboxCall) if
    /// the export is missing or mistyped, if the call traps, or if the
    /// sandbox was closed.
    pub fn call(&mut self, name: &str, a: i32, b: i32, c: i32, d: i32, e: i32) -> Result<i32> {
        let Some(instance) = self.instance else {
            return Err(Error::sandbox_call("sandbox is closed"));
        };

        let func = instance
            .get_typed_func::<(i32, i32, i32, i32, i32), i32>(&mut self.store, name)
            .map_err(Error::sandbox_call)?;

        func.call(&mut self.store, (a, b, c, d, e))
            .map_err(Error::sandbox_call)
    }

    /// Releases the module instance.
    ///
    /// Further calls fail; closing twice is a no-op.
    pub fn close(&mut self) {
        self.instance = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instantiates_bundled_module() {
        let sandbox = Sandbox::new().expect("sandbox init failed");
        drop(sandbox);
    }

    #[test]
    fn calls_every_export() {
        let mut sandbox = Sandbox::new().expect("sandbox init failed");
        for name in ["cdx", "rdx", "bdx", "ndx", "mdx"] {
            sandbox.call(name, 1, 2, 3, 4, 5).expect(name);
        }
    }

    #[test]
    fn calls_are_deterministic() {
        let mut sandbox = Sandbox::new().expect("sandbox init failed");
        let first = sandbox.call("cdx", 10, 20, 30, 40, 50).expect("call failed");
        let second = sandbox.call("cdx", 10, 20, 30, 40, 50).expect("call failed");
        assert_eq!(first, second);
    }

    #[test]
    fn missing_export_is_a_call_error() {
        let mut sandbox = Sandbox::new().expect("sandbox init failed");
        let err = sandbox
            .call("zdx", 1, 2, 3, 4, 5)
            .expect_err("expected missing export to fail");
        assert_eq!(err.kind, crate::error::ErrorKind::SandboxCall);
    }

    #[test]
    fn double_close_is_not_an_error() {
        let mut sandbox = Sandbox::new().expect("sandbox init failed");
        sandbox.close();
        sandbox.close();

        let err = sandbox
            .call("cdx", 1, 2, 3, 4, 5)
            .expect_err("expected call after close to fail");
        assert_eq!(err.kind, crate::error::ErrorKind::SandboxCall);
    }
}
