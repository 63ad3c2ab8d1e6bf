use crate::core::calculator::summary::DEFAULT_WEEKLY_TARGET_HOURS;
use crate::core::geofence::GeoFence;
use crate::errors::{AppError, AppResult};
use crate::models::coordinate::ReferenceLocation;
use crate::models::space::Space;
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Environment variable that points to an alternative configuration file.
pub const CONFIG_ENV: &str = "BITACORA_CONFIG";

/// Per-space settings: where people may check in from, and who may.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpaceConfig {
    #[serde(default)]
    pub references: Vec<ReferenceLocation>,
    #[serde(default)]
    pub roster: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_weekly_target")]
    pub weekly_target_hours: f64,
    #[serde(default = "default_allowed_range")]
    pub allowed_range_meters: f64,
    #[serde(default = "default_spaces")]
    pub spaces: BTreeMap<Space, SpaceConfig>,
    /// category code → display label
    #[serde(default = "default_categories")]
    pub categories: BTreeMap<String, String>,
}

fn default_weekly_target() -> f64 {
    DEFAULT_WEEKLY_TARGET_HOURS
}
fn default_allowed_range() -> f64 {
    300.0
}

fn default_references() -> Vec<ReferenceLocation> {
    vec![
        ReferenceLocation::new(3.372007, -76.534116, Some("Location 1")),
        ReferenceLocation::new(3.375805, -76.532798, Some("Location 2")),
    ]
}

fn default_spaces() -> BTreeMap<Space, SpaceConfig> {
    let office_roster = [
        "ALEJANDRO GOMEZ COBO",
        "ANGIE NATALIA SANTANA ROJAS",
        "ASHLY CAICEDO",
        "DIANA MARULANDA",
        "EDUARD LUBO URBANO",
        "EDWIN PORTELA",
        "FRANCISCO EMERSON CASTAÑEDA RAMIREZ",
        "ISABELA OBREGON",
        "IVAN FERNANDO VASQUEZ MANCILLA",
        "JUAN DAVID TABARES",
        "JUAN PABLO CRUZ",
        "KERELYN GRUTIERREZ VENECIA",
        "LUIS SANTIAGO AZA JARAMILLO",
        "MARCOS AMILKAR MURILLO AGAMEZ",
        "SANTIAGO FERNANDO NACED ROJAS",
    ];

    let mut spaces = BTreeMap::new();
    spaces.insert(
        Space::Office,
        SpaceConfig {
            references: default_references(),
            roster: office_roster.iter().map(|s| s.to_string()).collect(),
        },
    );
    spaces.insert(
        Space::Auditorium,
        SpaceConfig {
            references: default_references(),
            roster: Vec::new(),
        },
    );
    spaces
}

fn default_categories() -> BTreeMap<String, String> {
    [
        ("capacitacion", "CAPACITACION"),
        ("convocatoria", "CONVOCATORIA"),
        ("correo_electronico", "CORREO ELECTRONICO"),
        ("estadistica_participacion", "ESTADISTICA DE PARTICIPACION"),
        ("eventos", "EVENTOS"),
        ("formulario", "FORMULARIO"),
        ("informe", "INFORME"),
        ("ofimatica", "OFIMATICA"),
        ("participacion", "PARTICIPACION"),
        ("prestamo", "PRESTAMO"),
        ("prestamo_equipos_sonido", "PRESTAMO DE EQUIPOS DE SONIDO"),
        ("propuesta", "PROPUESTA"),
        ("publicacion_redes", "PUBLICACION EN REDES SOCIALES"),
        ("reunion", "REUNION"),
        ("solicitud", "SOLICITUD"),
        ("tareas_bodega", "TAREAS DE BODEGA"),
        ("tareas_oficina", "TAREAS GENERALES DE OFICINA"),
        ("uniformes", "UNIFORMES"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file().to_string_lossy().to_string())
    }
}

impl Config {
    pub fn with_database(database: String) -> Self {
        Self {
            database,
            weekly_target_hours: default_weekly_target(),
            allowed_range_meters: default_allowed_range(),
            spaces: default_spaces(),
            categories: default_categories(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("bitacora")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".bitacora")
        }
    }

    /// Return the full path of the config file (`BITACORA_CONFIG` wins)
    pub fn config_file() -> PathBuf {
        match env::var(CONFIG_ENV) {
            Ok(p) if !p.trim().is_empty() => expand_tilde(&p),
            _ => Self::config_dir().join("bitacora.conf"),
        }
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("bitacora.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let mut cfg: Config = serde_yaml::from_str(content)?;
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();

        if !cfg.weekly_target_hours.is_finite() || cfg.weekly_target_hours <= 0.0 {
            return Err(AppError::Config(format!(
                "weekly_target_hours must be a positive number of hours, got {}",
                cfg.weekly_target_hours
            )));
        }
        Ok(cfg)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn space(&self, space: Space) -> Option<&SpaceConfig> {
        self.spaces.get(&space)
    }

    /// Names allowed to record attendance in `space`. Empty means "anyone".
    pub fn roster(&self, space: Space) -> &[String] {
        self.space(space).map(|s| s.roster.as_slice()).unwrap_or(&[])
    }

    /// Union of every roster, without duplicates, in configuration order.
    pub fn full_roster(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for sc in self.spaces.values() {
            for name in &sc.roster {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
        }
        out
    }

    pub fn fence(&self, space: Space) -> AppResult<GeoFence> {
        let references = self
            .space(space)
            .map(|s| s.references.clone())
            .unwrap_or_default();

        GeoFence::new(references, self.allowed_range_meters).map_err(|e| match e {
            AppError::Config(msg) => AppError::Config(format!("{} space: {msg}", space.label())),
            other => other,
        })
    }

    pub fn category_label<'a>(&'a self, code: &'a str) -> &'a str {
        self.categories.get(code).map(String::as_str).unwrap_or(code)
    }

    /// Initialize configuration and database files.
    ///
    /// An existing config file is kept: only its `database` entry changes,
    /// and only when `custom_db` is given. Without a file, defaults are written.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        let path = Self::config_file();

        let existing = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
            Some(Self::from_yaml(&content)?)
        } else {
            None
        };

        // DB name: user provided, then the configured one, then the default
        let db_path = match custom_db {
            Some(name) => {
                let p = expand_tilde(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => match &existing {
                Some(cfg) => PathBuf::from(&cfg.database),
                None => Self::database_file(),
            },
        };
        let database = db_path.to_string_lossy().to_string();

        let config = match existing {
            Some(cfg) => Config { database, ..cfg },
            None => Config::with_database(database),
        };

        // Write config file
        if !is_test {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(&path).map_err(|_| AppError::ConfigSave)?;
            file.write_all(yaml.as_bytes())
                .map_err(|_| AppError::ConfigSave)?;
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            if let Some(parent) = db_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::File::create(&db_path)?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let cfg = Config::from_yaml("database: /tmp/x.sqlite\n").unwrap();
        assert_eq!(cfg.weekly_target_hours, 20.0);
        assert_eq!(cfg.allowed_range_meters, 300.0);
        assert_eq!(cfg.roster(Space::Office).len(), 15);
        assert_eq!(cfg.category_label("reunion"), "REUNION");
        assert_eq!(cfg.category_label("unknown"), "unknown");
    }

    #[test]
    fn spaces_and_references_from_yaml() {
        let yaml = r#"
database: /tmp/x.sqlite
allowed_range_meters: 150
spaces:
  auditorium:
    references:
      - latitude: 3.0
        longitude: -76.0
        label: Hall
        radius_meters: 80
    roster: [ANA, LUIS]
"#;
        let cfg = Config::from_yaml(yaml).unwrap();
        assert_eq!(cfg.roster(Space::Auditorium), ["ANA", "LUIS"]);
        assert!(cfg.roster(Space::Office).is_empty());

        let fence = cfg.fence(Space::Auditorium).unwrap();
        assert_eq!(fence.allowed_range_meters(), 150.0);
        assert_eq!(fence.references()[0].radius_meters, Some(80.0));

        // office not configured → no references → unusable fence
        assert!(matches!(cfg.fence(Space::Office), Err(AppError::Config(_))));
    }

    #[test]
    fn weekly_target_must_be_positive() {
        for bad in ["0", "-5"] {
            let yaml = format!("database: /tmp/x.sqlite\nweekly_target_hours: {bad}\n");
            assert!(
                matches!(Config::from_yaml(&yaml), Err(AppError::Config(_))),
                "accepted weekly_target_hours: {bad}"
            );
        }
        let ok = Config::from_yaml("database: /tmp/x.sqlite\nweekly_target_hours: 12.5\n").unwrap();
        assert_eq!(ok.weekly_target_hours, 12.5);
    }

    #[test]
    fn yaml_round_trip_keeps_spaces() {
        let cfg = Config::with_database("/tmp/y.sqlite".into());
        let back = Config::from_yaml(&cfg.to_yaml().unwrap()).unwrap();
        assert_eq!(back.spaces.len(), 2);
        assert_eq!(back.full_roster().len(), 15);
    }
}
