use rhai::{CallFnOptions, Dynamic, Engine, FnAccess, Scope, AST};

use crate::bindings;
use crate::error::{Invoke, ScriptError};
use crate::hub::HostHub;

/// One live guest-runtime instance.
///
/// The session owns its engine, compiled program and scope as plain values:
/// dropping the session is the destroy operation, and Rust ownership makes
/// use-after-destroy unrepresentable. The lifecycle driver holds the only
/// session and always attempts the guest `shutdown` entry point before
/// dropping, so guest-held bridge state unwinds while the runtime is alive.
pub struct ScriptSession {
    engine: Engine,
    scope: Scope<'static>,
    ast: Option<AST>,
}

impl ScriptSession {
    /// Allocates a fresh engine and applies the binding registry. With the
    /// embedded rhai runtime this cannot fail; the `Creation` error variant
    /// exists for the contract (an embedding whose runtime cannot allocate is
    /// broken and treated as fatal by the caller).
    pub fn create(hub: &HostHub) -> Result<Self, ScriptError> {
        let mut engine = Engine::new();
        engine.set_fast_operators(true);
        bindings::install(&mut engine, hub);
        Ok(Self { engine, scope: Scope::new(), ast: None })
    }

    /// Compiles the script and runs its top-level statements once, which is
    /// what defines the `init`/`tick`/`shutdown` entry points. After a
    /// `Load` error the session holds no program and must be torn down by
    /// the caller; `invoke` on it degrades to `NotDefined`.
    pub fn load(&mut self, source_bytes: &[u8]) -> Result<(), ScriptError> {
        let source = std::str::from_utf8(source_bytes)
            .map_err(|err| ScriptError::Load(format!("script is not valid UTF-8: {err}")))?;
        let ast = self
            .engine
            .compile(source)
            .map_err(|err| ScriptError::Load(err.to_string()))?;
        self.scope = Scope::new();
        self.engine
            .run_ast_with_scope(&mut self.scope, &ast)
            .map_err(|err| ScriptError::Load(err.to_string()))?;
        self.ast = Some(ast);
        Ok(())
    }

    /// Calls a zero-argument entry point by name. Absence is resolved by
    /// looking the function up in the compiled program before calling, so an
    /// absent entry point is `NotDefined` while any fault raised *inside* a
    /// present one (including calling an undefined function, even one sharing
    /// the entry point's name) is `ScriptError::Runtime`. The entry point's
    /// return value, if any, is discarded. This is the single containment
    /// boundary and no guest fault crosses it as a panic. Top-level
    /// statements are not re-evaluated per call.
    pub fn invoke(&mut self, entry_point: &str) -> Result<Invoke, ScriptError> {
        let ast = match &self.ast {
            Some(ast) => ast,
            None => return Ok(Invoke::NotDefined),
        };
        // Private functions are invisible to external callers.
        let defined = ast
            .iter_functions()
            .any(|f| f.name == entry_point && f.params.is_empty() && f.access == FnAccess::Public);
        if !defined {
            return Ok(Invoke::NotDefined);
        }
        let options = CallFnOptions::new().eval_ast(false).rewind_scope(true);
        match self
            .engine
            .call_fn_with_options::<Dynamic>(options, &mut self.scope, ast, entry_point, ())
        {
            Ok(_) => Ok(Invoke::Invoked),
            Err(err) => Err(ScriptError::Runtime(err.to_string())),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.ast.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> (ScriptSession, HostHub) {
        let hub = HostHub::new();
        let session = ScriptSession::create(&hub).expect("session create");
        (session, hub)
    }

    #[test]
    fn load_error_on_broken_syntax_leaves_session_unloaded() {
        let (mut session, _hub) = session();
        let err = session.load(b"fn init( {").unwrap_err();
        assert!(matches!(err, ScriptError::Load(_)), "expected Load, got {err:?}");
        assert!(!session.is_loaded());
        assert_eq!(session.invoke("tick").expect("invoke"), Invoke::NotDefined);
    }

    #[test]
    fn missing_entry_point_is_not_an_error() {
        let (mut session, _hub) = session();
        session.load(b"fn init() { }").expect("load");
        assert_eq!(session.invoke("tick").expect("invoke"), Invoke::NotDefined);
        assert_eq!(session.invoke("init").expect("invoke"), Invoke::Invoked);
    }

    #[test]
    fn unknown_call_inside_entry_point_is_a_runtime_fault() {
        let (mut session, _hub) = session();
        session.load(b"fn tick() { this_function_does_not_exist(); }").expect("load");
        let err = session.invoke("tick").unwrap_err();
        assert!(matches!(err, ScriptError::Runtime(_)), "expected Runtime, got {err:?}");
    }

    #[test]
    fn value_returning_entry_point_is_not_a_fault() {
        let (mut session, hub) = session();
        // Idiomatic rhai: the last expression of a body is its return value.
        session
            .load(
                br#"
                fn init() { app::state::set("n", 0.0); }
                fn tick() {
                    app::state::set("n", app::state::get("n") + 1.0);
                    app::state::get("n")
                }
                "#,
            )
            .expect("load");
        session.invoke("init").expect("init");
        assert_eq!(session.invoke("tick").expect("tick"), Invoke::Invoked);
        assert_eq!(hub.state_number("n"), Some(1.0));
    }

    #[test]
    fn self_named_undefined_call_is_a_runtime_fault() {
        let (mut session, hub) = session();
        // `tick(42)` shares the entry point's name but no such overload is
        // defined; that is a fault, not absence, and it must not be silent.
        session
            .load(
                br#"
                fn tick() {
                    app::state::set("ran", 1.0);
                    tick(42);
                }
                "#,
            )
            .expect("load");
        let err = session.invoke("tick").unwrap_err();
        assert!(matches!(err, ScriptError::Runtime(_)), "expected Runtime, got {err:?}");
        assert_eq!(hub.state_number("ran"), Some(1.0), "body ran up to the bad call");
    }

    #[test]
    fn top_level_faults_surface_as_load_errors() {
        let (mut session, _hub) = session();
        let err = session.load(b"let x = 1; x.no_such_method();").unwrap_err();
        assert!(matches!(err, ScriptError::Load(_)), "expected Load, got {err:?}");
    }

    #[test]
    fn state_bindings_persist_across_invokes() {
        let (mut session, hub) = session();
        session
            .load(
                br#"
                fn init() { app::state::set("n", 0.0); }
                fn tick() { app::state::set("n", app::state::get("n") + 1.0); }
                "#,
            )
            .expect("load");
        session.invoke("init").expect("init");
        for _ in 0..3 {
            session.invoke("tick").expect("tick");
        }
        assert_eq!(hub.state_number("n"), Some(3.0));
    }

    #[test]
    fn math_flavor_and_rand_bindings_are_callable() {
        use crate::flavor::{FlavorSet, FlavorValue};

        let (mut session, hub) = session();
        let mut flavor = FlavorSet::default();
        flavor.insert("speed", FlavorValue::Number { value: 2.5, unit: None, hint: None });
        hub.set_flavor(flavor);
        session
            .load(
                br#"
                fn init() {
                    let t = trafo();
                    t.rotate_global(1.5707963, "Y");
                    t.translate_local(0.0, 0.0, -1.0);
                    let p = t.position();
                    app::state::set("x", p[0]);
                    let m = t.matrix();
                    app::state::set("mx", m[12]);
                    app::state::set("speed", app::flavor::number("speed"));
                    app::state::set("r", rand(0.0, 1.0));
                }
                "#,
            )
            .expect("load");
        session.invoke("init").expect("init");
        let x = hub.state_number("x").expect("x");
        assert!((x + 1.0).abs() < 1e-4, "local -Z after a quarter turn lands at -X, got {x}");
        let mx = hub.state_number("mx").expect("mx");
        assert!((mx - x).abs() < 1e-6, "matrix translation column must match position");
        assert_eq!(hub.state_number("speed"), Some(2.5));
        let r = hub.state_number("r").expect("r");
        assert!((0.0..1.0).contains(&r), "rand out of range: {r}");
    }

    #[test]
    fn input_and_time_bindings_read_hub_snapshots() {
        use crate::input::{Input, InputSource};

        let (mut session, hub) = session();
        let mut input = Input::new();
        input.set(InputSource::WindowWidth, 800.0);
        hub.set_input(input.snapshot());
        hub.set_clock(0.016, 1.0, 60);
        session
            .load(
                br#"
                fn tick() {
                    app::state::set("w", app::input::value("WINDOW_WIDTH"));
                    app::state::set("wi", app::input::value_i("WINDOW_WIDTH").to_float());
                    app::state::set("dt", app::time::delta());
                    app::state::set("nope", app::input::value("KEY_BANANA"));
                }
                "#,
            )
            .expect("load");
        session.invoke("tick").expect("tick");
        assert_eq!(hub.state_number("w"), Some(800.0));
        assert_eq!(hub.state_number("wi"), Some(800.0));
        assert!((hub.state_number("dt").expect("dt") - 0.016).abs() < 1e-6);
        assert_eq!(hub.state_number("nope"), Some(0.0), "unknown source reads as zero");
    }

    #[test]
    fn guest_faults_never_escape_as_panics() {
        let (mut session, _hub) = session();
        session.load(b"fn tick() { throw \"boom\"; }").expect("load");
        for _ in 0..2 {
            assert!(session.invoke("tick").is_err(), "throw should map to Runtime");
        }
    }
}
