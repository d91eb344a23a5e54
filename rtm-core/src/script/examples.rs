pub const DEFAULT_SCRIPT: &str = "# Click \"Example\" to load an example script.\n";

/// Named starter scripts offered by the script console.
pub const EXAMPLE_SCRIPTS: &[(&str, &str)] = &[
    (
        "Basic",
        r#"# Spectral sweep over the solar range.
engine = "synthetic"

[sweep]
"wavelength.value" = { start = 0.2, stop = 2.5, step = 0.005 }
"#,
    ),
    (
        "Ozone Sweep",
        r#"# Ozone column against the Chappuis band.
engine = "synthetic"

[base]
atmosphere.water = 2.0

[sweep]
"wavelength.value" = { start = 0.5, stop = 0.65, step = 0.0025 }
"atmosphere.ozone" = { start = 0.4, stop = 0.61, step = 0.04 }
"#,
    ),
    (
        "Profile Grid",
        r#"# Atmosphere and aerosol profile combinations.
[engine]
name = "synthetic"

[sweep]
"wavelength.value" = { start = 0.2, stop = 2.5, step = 0.005 }
"atmosphere.name" = ["MidlatitudeSummer", "SubarcticWinter", "Tropical"]
"aerosol_profile.name" = ["Maritime", "Urban", "Continental"]
"#,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{check_script, interpret_script};

    #[test]
    fn every_example_interprets() {
        for (name, text) in EXAMPLE_SCRIPTS {
            let job = interpret_script(text).unwrap_or_else(|err| panic!("{name}: {err}"));
            assert!(job.sweep.sweep_size() > 0, "{name}");
        }
    }

    #[test]
    fn profile_grid_has_three_dims() {
        let job = interpret_script(EXAMPLE_SCRIPTS[2].1).unwrap();
        assert_eq!(job.sweep.axes().len(), 3);
        assert_eq!(job.sweep.dims()[1..], [("atmosphere.name", 3), ("aerosol_profile.name", 3)]);
    }

    #[test]
    fn default_script_lacks_bindings() {
        assert!(check_script(DEFAULT_SCRIPT).is_err());
    }
}
