//! Profile entity and its enumerations.
//!
//! Wire values keep the deployed API contract (Spanish identifiers); the
//! storage layer persists the same strings.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Account role within the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[serde(rename = "alumno")]
    Student,
    #[serde(rename = "docente")]
    Teacher,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "alumno",
            Role::Teacher => "docente",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "alumno" => Ok(Role::Student),
            "docente" => Ok(Role::Teacher),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Learning environment the account operates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Casa,
    Primaria,
    Secundaria,
    Preescolar,
    Preparatoria,
    Universidad,
    CentroRehabilitacion,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Casa => "casa",
            Environment::Primaria => "primaria",
            Environment::Secundaria => "secundaria",
            Environment::Preescolar => "preescolar",
            Environment::Preparatoria => "preparatoria",
            Environment::Universidad => "universidad",
            Environment::CentroRehabilitacion => "centro_rehabilitacion",
        }
    }
}

impl TryFrom<&str> for Environment {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "casa" => Ok(Environment::Casa),
            "primaria" => Ok(Environment::Primaria),
            "secundaria" => Ok(Environment::Secundaria),
            "preescolar" => Ok(Environment::Preescolar),
            "preparatoria" => Ok(Environment::Preparatoria),
            "universidad" => Ok(Environment::Universidad),
            "centro_rehabilitacion" => Ok(Environment::CentroRehabilitacion),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Highest education level reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    // Special levels
    Ninguno,
    Analfabeta,
    // Basic education
    EducacionInicial,
    Preescolar,
    Primaria,
    Secundaria,
    // Upper secondary
    BachilleratoGeneral,
    BachilleratoTecnico,
    BachilleratoProfesional,
    // Higher education
    Licenciatura,
    Especialidad,
    Maestria,
    Doctorado,
    // Other tracks
    TecnicoSuperiorUniversitario,
    ProfesionalAsociado,
    EducacionNormal,
    AlfabetizacionAdultos,
    PrimariaAdultos,
    SecundariaAdultos,
}

impl EducationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EducationLevel::Ninguno => "ninguno",
            EducationLevel::Analfabeta => "analfabeta",
            EducationLevel::EducacionInicial => "educacion_inicial",
            EducationLevel::Preescolar => "preescolar",
            EducationLevel::Primaria => "primaria",
            EducationLevel::Secundaria => "secundaria",
            EducationLevel::BachilleratoGeneral => "bachillerato_general",
            EducationLevel::BachilleratoTecnico => "bachillerato_tecnico",
            EducationLevel::BachilleratoProfesional => "bachillerato_profesional",
            EducationLevel::Licenciatura => "licenciatura",
            EducationLevel::Especialidad => "especialidad",
            EducationLevel::Maestria => "maestria",
            EducationLevel::Doctorado => "doctorado",
            EducationLevel::TecnicoSuperiorUniversitario => "tecnico_superior_universitario",
            EducationLevel::ProfesionalAsociado => "profesional_asociado",
            EducationLevel::EducacionNormal => "educacion_normal",
            EducationLevel::AlfabetizacionAdultos => "alfabetizacion_adultos",
            EducationLevel::PrimariaAdultos => "primaria_adultos",
            EducationLevel::SecundariaAdultos => "secundaria_adultos",
        }
    }
}

impl TryFrom<&str> for EducationLevel {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "ninguno" => Ok(EducationLevel::Ninguno),
            "analfabeta" => Ok(EducationLevel::Analfabeta),
            "educacion_inicial" => Ok(EducationLevel::EducacionInicial),
            "preescolar" => Ok(EducationLevel::Preescolar),
            "primaria" => Ok(EducationLevel::Primaria),
            "secundaria" => Ok(EducationLevel::Secundaria),
            "bachillerato_general" => Ok(EducationLevel::BachilleratoGeneral),
            "bachillerato_tecnico" => Ok(EducationLevel::BachilleratoTecnico),
            "bachillerato_profesional" => Ok(EducationLevel::BachilleratoProfesional),
            "licenciatura" => Ok(EducationLevel::Licenciatura),
            "especialidad" => Ok(EducationLevel::Especialidad),
            "maestria" => Ok(EducationLevel::Maestria),
            "doctorado" => Ok(EducationLevel::Doctorado),
            "tecnico_superior_universitario" => {
                Ok(EducationLevel::TecnicoSuperiorUniversitario)
            }
            "profesional_asociado" => Ok(EducationLevel::ProfesionalAsociado),
            "educacion_normal" => Ok(EducationLevel::EducacionNormal),
            "alfabetizacion_adultos" => Ok(EducationLevel::AlfabetizacionAdultos),
            "primaria_adultos" => Ok(EducationLevel::PrimariaAdultos),
            "secundaria_adultos" => Ok(EducationLevel::SecundariaAdultos),
            other => Err(format!("unknown education level: {other}")),
        }
    }
}

impl std::fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile owned exclusively by one User (1:1, deleted with it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub profile_id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
    pub environment: Environment,
    pub education_level: EducationLevel,
}

impl Profile {
    /// Create a profile for a user with the default role.
    pub fn new(user_id: Uuid, environment: Environment, education_level: EducationLevel) -> Self {
        Self {
            profile_id: Uuid::new_v4(),
            user_id,
            role: Role::Student,
            environment,
            education_level,
        }
    }
}
