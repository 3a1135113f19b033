//! Build script for thermotip-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates station.toml and generates the loop tuning from it

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use thermotip_core::config::{BlinkTiming, ControlParams, PersistedConfig, TimerSharing};

/// Every section and key station.toml may contain
const KNOWN_KEYS: &[(&str, &[&str])] = &[
    ("heat", &["min", "max", "sleep"]),
    (
        "sensor",
        &[
            "min_adc_rt",
            "max_adc_rt",
            "short_circuit_below",
            "open_circuit_above",
        ],
    ),
    (
        "buttons",
        &[
            "short_press_ms",
            "long_press_ms",
            "fast_increment",
            "timer_sharing",
        ],
    ),
    (
        "display",
        &[
            "setpoint_ms",
            "setpoint_band",
            "sleep_blink_period",
            "heat_blink_period",
            "blink_timing",
        ],
    ),
    ("storage", &["save_timeout_ms"]),
    (
        "defaults",
        &["heat_point", "sleep_timeout_ms", "deep_sleep_timeout_ms"],
    ),
];

fn main() {
    setup_linker();
    let params = load_params();
    write_tuning(&params);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read station.toml on top of the built-in defaults
fn load_params() -> ControlParams {
    println!("cargo:rerun-if-changed=station.toml");

    let config_path = Path::new("station.toml");

    // No file means stock tuning
    if !config_path.exists() {
        println!("cargo:warning=station.toml not found, using default tuning");
        return ControlParams::DEFAULT;
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read station.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in station.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    check_unknown_keys(&config, &mut errors);

    let mut reader = Reader {
        config: &config,
        errors: &mut errors,
    };
    let defaults = ControlParams::DEFAULT;
    let default_record = defaults.default_config;

    let params = ControlParams {
        min_heat: reader.u16("heat", "min", defaults.min_heat),
        max_heat: reader.u16("heat", "max", defaults.max_heat),
        sleep_temp: reader.u16("heat", "sleep", defaults.sleep_temp),
        min_adc_rt: reader.u16("sensor", "min_adc_rt", defaults.min_adc_rt),
        max_adc_rt: reader.u16("sensor", "max_adc_rt", defaults.max_adc_rt),
        short_circuit_below: reader.u16(
            "sensor",
            "short_circuit_below",
            defaults.short_circuit_below,
        ),
        open_circuit_above: reader.u16(
            "sensor",
            "open_circuit_above",
            defaults.open_circuit_above,
        ),
        short_press_ms: reader.u32("buttons", "short_press_ms", defaults.short_press_ms),
        long_press_ms: reader.u32("buttons", "long_press_ms", defaults.long_press_ms),
        fast_increment: reader.u16("buttons", "fast_increment", defaults.fast_increment),
        timer_sharing: match reader.choice(
            "buttons",
            "timer_sharing",
            &["shared", "independent"],
        ) {
            Some(1) => TimerSharing::Independent,
            Some(_) => TimerSharing::Shared,
            None => defaults.timer_sharing,
        },
        save_timeout_ms: reader.u32("storage", "save_timeout_ms", defaults.save_timeout_ms),
        setpoint_display_ms: reader.u32("display", "setpoint_ms", defaults.setpoint_display_ms),
        setpoint_band: reader.u16("display", "setpoint_band", defaults.setpoint_band),
        sleep_blink_period: reader.u32(
            "display",
            "sleep_blink_period",
            defaults.sleep_blink_period,
        ),
        heat_blink_period: reader.u32("display", "heat_blink_period", defaults.heat_blink_period),
        blink_timing: match reader.choice("display", "blink_timing", &["iterations", "clock"]) {
            Some(1) => BlinkTiming::Clock,
            Some(_) => BlinkTiming::IterationCount,
            None => defaults.blink_timing,
        },
        default_config: PersistedConfig::new(
            reader.u16("defaults", "heat_point", default_record.heat_point),
            reader.u32(
                "defaults",
                "sleep_timeout_ms",
                default_record.sleep_timeout_ms,
            ),
            reader.u32(
                "defaults",
                "deep_sleep_timeout_ms",
                default_record.deep_sleep_timeout_ms,
            ),
        ),
    };

    // Cross-field checks are the same ones the firmware runs at boot
    if errors.is_empty() {
        if let Err(e) = params.validate() {
            errors.push(format!("inconsistent tuning: {:?}", e));
        }
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid station.toml                                     ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=station.toml validated successfully");
    params
}

/// Typed lookups that record problems instead of failing fast
struct Reader<'a> {
    config: &'a toml::Value,
    errors: &'a mut Vec<String>,
}

impl Reader<'_> {
    fn get(&self, section: &str, key: &str) -> Option<&toml::Value> {
        self.config.get(section).and_then(|s| s.get(key))
    }

    fn integer(&mut self, section: &str, key: &str, max: i64) -> Option<i64> {
        match self.get(section, key) {
            None => None,
            Some(toml::Value::Integer(v)) if (0..=max).contains(v) => Some(*v),
            Some(toml::Value::Integer(_)) => {
                self.errors
                    .push(format!("[{}] {} must be 0-{}", section, key, max));
                None
            }
            Some(_) => {
                self.errors
                    .push(format!("[{}] {} must be an integer", section, key));
                None
            }
        }
    }

    fn u16(&mut self, section: &str, key: &str, default: u16) -> u16 {
        self.integer(section, key, i64::from(u16::MAX))
            .and_then(|v| u16::try_from(v).ok())
            .unwrap_or(default)
    }

    fn u32(&mut self, section: &str, key: &str, default: u32) -> u32 {
        self.integer(section, key, i64::from(u32::MAX))
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(default)
    }

    /// Index of the chosen option, if the key is present and valid
    fn choice(&mut self, section: &str, key: &str, options: &[&str]) -> Option<usize> {
        match self.get(section, key) {
            None => None,
            Some(toml::Value::String(s)) => {
                let index = options.iter().position(|o| o == s);
                if index.is_none() {
                    self.errors.push(format!(
                        "[{}] {} must be one of: {}",
                        section,
                        key,
                        options.join(", ")
                    ));
                }
                index
            }
            Some(_) => {
                self.errors
                    .push(format!("[{}] {} must be a string", section, key));
                None
            }
        }
    }
}

/// Catch misspelled sections and keys, which would otherwise be ignored
fn check_unknown_keys(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (section, value) in root {
        let Some((_, keys)) = KNOWN_KEYS.iter().find(|(name, _)| name == section) else {
            errors.push(format!("unknown section [{}]", section));
            continue;
        };
        let Some(table) = value.as_table() else {
            errors.push(format!("[{}] must be a table", section));
            continue;
        };
        for key in table.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", section, key));
            }
        }
    }
}

/// Write the tuning constant included by src/config.rs
fn write_tuning(params: &ControlParams) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let record = params.default_config;

    let source = format!(
        "// Generated by build.rs from station.toml\n\
         pub const CONTROL_PARAMS: ControlParams = ControlParams {{\n    \
             min_heat: {},\n    \
             max_heat: {},\n    \
             sleep_temp: {},\n    \
             min_adc_rt: {},\n    \
             max_adc_rt: {},\n    \
             short_circuit_below: {},\n    \
             open_circuit_above: {},\n    \
             short_press_ms: {},\n    \
             long_press_ms: {},\n    \
             fast_increment: {},\n    \
             save_timeout_ms: {},\n    \
             setpoint_display_ms: {},\n    \
             setpoint_band: {},\n    \
             sleep_blink_period: {},\n    \
             heat_blink_period: {},\n    \
             timer_sharing: TimerSharing::{:?},\n    \
             blink_timing: BlinkTiming::{:?},\n    \
             default_config: PersistedConfig::new({}, {}, {}),\n\
         }};\n",
        params.min_heat,
        params.max_heat,
        params.sleep_temp,
        params.min_adc_rt,
        params.max_adc_rt,
        params.short_circuit_below,
        params.open_circuit_above,
        params.short_press_ms,
        params.long_press_ms,
        params.fast_increment,
        params.save_timeout_ms,
        params.setpoint_display_ms,
        params.setpoint_band,
        params.sleep_blink_period,
        params.heat_blink_period,
        params.timer_sharing,
        params.blink_timing,
        record.heat_point,
        record.sleep_timeout_ms,
        record.deep_sleep_timeout_ms,
    );

    fs::write(out_dir.join("tuning.rs"), source).unwrap();
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
