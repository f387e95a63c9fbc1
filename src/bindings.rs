use glam::Vec3;
use rand::Rng;
use rhai::{Array, Dynamic, Engine, Module};

use crate::hub::{HostCommand, HostHub, LogLevel};
use crate::input::InputSource;
use crate::math::{Camera, Trafo};

/// Installs the full host capability surface into a fresh engine.
///
/// This is the Binding Registry: one declaration of what guest code may call,
/// applied to every newly created session. Guest paths are rooted at the
/// static `app` module (`app::log::info`, `app::input::value`, ...); the shape
/// is stable across reloads. All side effects go through the [`HostHub`], so
/// nothing here holds references into the driver.
pub fn install(engine: &mut Engine, hub: &HostHub) {
    register_math(engine);

    engine.register_fn("rand", |min: f64, max: f64| {
        if max > min {
            rand::thread_rng().gen_range(min..max)
        } else {
            min
        }
    });

    let mut root = Module::new();
    root.set_sub_module("log", log_module(hub.clone()));
    root.set_sub_module("control", control_module(hub.clone()));
    root.set_sub_module("input", input_module(hub.clone()));
    root.set_sub_module("time", time_module(hub.clone()));
    root.set_sub_module("state", state_module(hub.clone()));
    root.set_sub_module("flavor", flavor_module(hub.clone()));
    root.set_sub_module("render", render_module(hub.clone()));
    root.set_sub_module("audio", audio_module(hub.clone()));
    engine.register_static_module("app", root.into());
}

fn log_module(hub: HostHub) -> Module {
    let mut module = Module::new();
    for (name, level) in [
        ("debug", LogLevel::Debug),
        ("info", LogLevel::Info),
        ("warn", LogLevel::Warn),
        ("error", LogLevel::Error),
    ] {
        let hub = hub.clone();
        module.set_native_fn(name, move |message: &str| {
            hub.log(level, message);
            Ok(())
        });
    }
    module
}

fn control_module(hub: HostHub) -> Module {
    let mut module = Module::new();
    {
        let hub = hub.clone();
        module.set_native_fn("exit", move || {
            hub.push_command(HostCommand::Exit);
            Ok(())
        });
    }
    {
        let hub = hub.clone();
        module.set_native_fn("enable_vsync", move |on: bool| {
            hub.push_command(HostCommand::EnableVsync(on));
            Ok(())
        });
    }
    {
        let hub = hub.clone();
        module.set_native_fn("enable_fullscreen", move |on: bool| {
            hub.push_command(HostCommand::EnableFullscreen(on));
            Ok(())
        });
    }
    {
        let hub = hub.clone();
        module.set_native_fn("catch_mouse", move |on: bool| {
            hub.push_command(HostCommand::CatchMouse(on));
            Ok(())
        });
    }
    {
        let hub = hub.clone();
        module.set_native_fn("send_to_env", move |command: &str| {
            hub.push_command(HostCommand::SendToEnv(command.to_string()));
            Ok(())
        });
    }
    module
}

fn input_module(hub: HostHub) -> Module {
    let mut module = Module::new();
    {
        let hub = hub.clone();
        module.set_native_fn("value", move |name: &str| {
            Ok(lookup(name).map(|s| hub.input_value(s) as f64).unwrap_or(0.0))
        });
    }
    {
        let hub = hub.clone();
        module.set_native_fn("value_i", move |name: &str| {
            Ok(lookup(name).map(|s| hub.input_value(s) as i64).unwrap_or(0))
        });
    }
    {
        let hub = hub.clone();
        module.set_native_fn("delta", move |name: &str| {
            Ok(lookup(name).map(|s| hub.input_delta(s) as f64).unwrap_or(0.0))
        });
    }
    module
}

fn lookup(name: &str) -> Option<InputSource> {
    InputSource::from_name(name)
}

fn time_module(hub: HostHub) -> Module {
    let mut module = Module::new();
    {
        let hub = hub.clone();
        module.set_native_fn("delta", move || Ok(hub.delta() as f64));
    }
    {
        let hub = hub.clone();
        module.set_native_fn("elapsed", move || Ok(hub.elapsed() as f64));
    }
    {
        let hub = hub.clone();
        module.set_native_fn("frame", move || Ok(hub.frame() as i64));
    }
    module
}

fn state_module(hub: HostHub) -> Module {
    let mut module = Module::new();
    {
        let hub = hub.clone();
        module.set_native_fn("set", move |name: &str, value: f64| {
            hub.state_set(name, value);
            Ok(())
        });
    }
    {
        let hub = hub.clone();
        module.set_native_fn("get", move |name: &str| {
            Ok(hub.state_number(name).unwrap_or(0.0))
        });
    }
    {
        let hub = hub.clone();
        module.set_native_fn("has", move |name: &str| Ok(hub.state_number(name).is_some()));
    }
    module
}

fn flavor_module(hub: HostHub) -> Module {
    let mut module = Module::new();
    {
        let hub = hub.clone();
        module.set_native_fn("number", move |name: &str| {
            Ok(hub.flavor_number(name).unwrap_or(0.0))
        });
    }
    {
        let hub = hub.clone();
        module.set_native_fn("vec3", move |name: &str| {
            let v = hub.flavor_vec3(name).unwrap_or(Vec3::ZERO);
            Ok(vec3_array(v))
        });
    }
    {
        let hub = hub.clone();
        module.set_native_fn("has", move |name: &str| Ok(hub.flavor_has(name)));
    }
    module
}

fn render_module(hub: HostHub) -> Module {
    let mut module = Module::new();
    let hub_color = hub;
    module.set_native_fn("set_clear_color", move |r: f64, g: f64, b: f64, a: f64| {
        hub_color.push_command(HostCommand::SetClearColor([r as f32, g as f32, b as f32, a as f32]));
        Ok(())
    });
    module
}

fn audio_module(hub: HostHub) -> Module {
    let mut module = Module::new();
    module.set_native_fn("play", move |trigger: &str| {
        hub.push_command(HostCommand::PlayAudio(trigger.to_string()));
        Ok(())
    });
    module
}

fn vec3_array(v: Vec3) -> Array {
    vec![Dynamic::from(v.x as f64), Dynamic::from(v.y as f64), Dynamic::from(v.z as f64)]
}

/// Transform and camera value objects. Free adapters over glam, constructed
/// by guest code with `trafo()` / `camera(fov, aspect)`.
fn register_math(engine: &mut Engine) {
    engine.register_type_with_name::<Trafo>("Trafo");
    engine.register_fn("trafo", Trafo::identity);
    engine.register_fn("rotate_global", |t: &mut Trafo, angle: f64, axis: &str| {
        t.rotate_global(angle as f32, axis);
    });
    engine.register_fn("rotate_local", |t: &mut Trafo, angle: f64, axis: &str| {
        t.rotate_local(angle as f32, axis);
    });
    engine.register_fn("translate_global", |t: &mut Trafo, x: f64, y: f64, z: f64| {
        t.translate_global(Vec3::new(x as f32, y as f32, z as f32));
    });
    engine.register_fn("translate_local", |t: &mut Trafo, x: f64, y: f64, z: f64| {
        t.translate_local(Vec3::new(x as f32, y as f32, z as f32));
    });
    engine.register_fn("set_scale_local", |t: &mut Trafo, x: f64, y: f64, z: f64| {
        t.set_scale_local(Vec3::new(x as f32, y as f32, z as f32));
    });
    engine.register_fn("position", |t: &mut Trafo| vec3_array(t.translation));
    // Column-major, 16 elements, for guests that hand a transform onward.
    engine.register_fn("matrix", |t: &mut Trafo| {
        t.matrix().to_cols_array().iter().map(|v| Dynamic::from(*v as f64)).collect::<Array>()
    });

    engine.register_type_with_name::<Camera>("Camera");
    engine.register_fn("camera", |fov_y_deg: f64, aspect: f64| {
        Camera::new(fov_y_deg as f32, aspect as f32)
    });
    engine.register_fn("get_trafo", |c: &mut Camera| c.trafo);
    engine.register_fn("set_trafo", |c: &mut Camera, t: Trafo| c.trafo = t);
    engine.register_fn("cast_ray", |c: &mut Camera, vx: f64, vy: f64| {
        let (origin, dir) = c.cast_ray(vx as f32, vy as f32);
        vec![
            Dynamic::from(origin.x as f64),
            Dynamic::from(origin.y as f64),
            Dynamic::from(origin.z as f64),
            Dynamic::from(dir.x as f64),
            Dynamic::from(dir.y as f64),
            Dynamic::from(dir.z as f64),
        ]
    });
}
