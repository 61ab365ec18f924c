use serde::{Deserialize, Deserializer, Serialize};

/// Identifiers arrive as JSON numbers or strings; both are held as opaque strings.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Int(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

/// Format a percentage without a trailing `.0` (80 -> "80%", 85.5 -> "85.5%").
pub fn format_percent(value: f64) -> String {
    format!("{}%", value)
}

/// Class ("turma") metadata as returned by `GET turmas/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRecord {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "codigo_acesso", default)]
    pub access_code: Option<String>,
    #[serde(rename = "total_alunos", default)]
    pub total_students: Option<u32>,
    /// 0-10 scale.
    #[serde(rename = "media_geral", default)]
    pub average_grade: Option<f64>,
    /// 0-100 percent.
    #[serde(rename = "frequencia_media", default)]
    pub average_attendance: Option<f64>,
    #[serde(rename = "professor_nome", default)]
    pub teacher_name: Option<String>,
}

impl ClassRecord {
    pub fn description_display(&self) -> String {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("Sem descrição")
            .to_string()
    }

    /// The code shown on screen; `-----` when the class has none.
    pub fn access_code_display(&self) -> String {
        self.access_code()
            .unwrap_or("-----")
            .to_string()
    }

    pub fn access_code(&self) -> Option<&str> {
        self.access_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    pub fn total_students_display(&self) -> String {
        self.total_students.unwrap_or(0).to_string()
    }

    pub fn average_grade_display(&self) -> String {
        format!("{:.1}", self.average_grade.unwrap_or(0.0))
    }

    pub fn average_attendance_display(&self) -> String {
        format_percent(self.average_attendance.unwrap_or(0.0))
    }
}

/// One roster entry from `GET turmas/{id}/alunos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "frequencia", default)]
    pub attendance_percent: Option<f64>,
    /// 0-10 scale; absent grades classify as 0.
    #[serde(rename = "media", default)]
    pub grade: Option<f64>,
}

/// Dashboard list entry from `GET turmas?userId=&role=`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSummary {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "codigo_acesso", default)]
    pub access_code: Option<String>,
    #[serde(rename = "professor_nome", default)]
    pub teacher_name: Option<String>,
    #[serde(rename = "num_alunos", default)]
    pub student_count: u32,
}
