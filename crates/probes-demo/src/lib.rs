//! Demo probe module
//!
//! A minimal stand-in for the fixture modules that exercise a real object
//! model. Build the workspace, then point the harness at the build output:
//!
//! ```text
//! cargo build
//! proberun target/debug
//! ```

use proberun_harness::{export_probes, Probe, ProbeError, TestModule};

#[derive(Default)]
struct Rect {
    width: f64,
    height: f64,
}

impl Rect {
    fn area(&self) -> f64 {
        self.width * self.height
    }
}

fn register(module: &mut TestModule) {
    module.push(Probe::new("rect_area", || {
        let rect = Rect {
            width: 3.0,
            height: 4.0,
        };
        if (rect.area() - 12.0).abs() > f64::EPSILON {
            return Err(ProbeError::new(format!(
                "expected area 12, got {}",
                rect.area()
            )));
        }
        Ok(())
    }));

    module.push(Probe::new("rect_default_is_empty", || {
        assert_eq!(Rect::default().area(), 0.0);
        Ok(())
    }));

    // Written against the old boolean convention on purpose, to keep the
    // adapter path exercised outside unit tests.
    module.push(Probe::from_legacy("legacy_boolean_probe", || true));
}

export_probes!(register);
