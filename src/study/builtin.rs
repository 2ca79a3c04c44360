//! Built-in subjects and first-run sample data

use chrono::NaiveDate;

use super::models::{legacy_review_id, ScheduledReview, StudySession, Subject};

/// Highest id reserved for built-in subjects
pub const BUILTIN_MAX_ID: i64 = 10;

/// All built-in subjects, in display order
pub fn builtin_subjects() -> Vec<Subject> {
    vec![
        subject(1, "Cardiologia", "Clínica", &["Arritmias", "Insuficiência Cardíaca", "Coronariopatias", "Hipertensão", "Valvopatias"]),
        subject(2, "Pneumologia", "Clínica", &["Asma", "DPOC", "Pneumonias", "Derrame Pleural", "Embolia Pulmonar"]),
        subject(3, "Gastroenterologia", "Clínica", &["DRGE", "Úlcera Péptica", "Hepatites", "Cirrose", "Pancreatite"]),
        subject(4, "Neurologia", "Clínica", &["AVC", "Epilepsia", "Cefaléias", "Demências", "Parkinson"]),
        subject(5, "Endocrinologia", "Clínica", &["Diabetes", "Tireoidopatias", "Obesidade", "Osteoporose", "Adrenal"]),
        subject(6, "Ortopedia", "Cirúrgica", &["Fraturas", "Artrose", "Meniscopatias", "Luxações", "Tendinites"]),
        subject(7, "Cirurgia Geral", "Cirúrgica", &["Apendicite", "Hérnias", "Vesícula", "Trauma", "Abdome Agudo"]),
        subject(8, "Ginecologia", "Cirúrgica", &["Miomas", "Cistos", "Endometriose", "Câncer Ginecológico", "Gravidez"]),
        subject(9, "Urologia", "Cirúrgica", &["Cálculos", "ITU", "Câncer Urológico", "Disfunções", "Próstata"]),
        subject(10, "Pediatria", "Clínica", &["Crescimento", "Vacinação", "Infecções", "Alergias", "Desenvolvimento"]),
    ]
}

/// Whether `id` belongs to a built-in subject
pub fn is_builtin(id: i64) -> bool {
    (1..=BUILTIN_MAX_ID).contains(&id)
}

fn subject(id: i64, name: &str, specialty: &str, topics: &[&str]) -> Subject {
    Subject {
        id,
        name: name.to_string(),
        specialty: specialty.to_string(),
        topics: topics.iter().map(|t| t.to_string()).collect(),
        custom: false,
    }
}

/// Sessions written on first run so a fresh install has something to show
pub fn sample_studies() -> Vec<StudySession> {
    vec![
        StudySession::new(
            1_640_995_200_000,
            1,
            "Cardiologia".to_string(),
            "Arritmias".to_string(),
            8,
            10,
            ymd(2024, 1, 15),
            Some("Tive dificuldade com os casos de FA com RVR".to_string()),
        ),
        StudySession::new(
            1_641_081_600_000,
            2,
            "Pneumologia".to_string(),
            "Pneumonias".to_string(),
            9,
            10,
            ymd(2024, 1, 16),
            None,
        ),
    ]
}

/// Pending review matching the first sample session
pub fn sample_reviews() -> Vec<ScheduledReview> {
    vec![ScheduledReview {
        id: legacy_review_id("2001"),
        subject_id: 1,
        subject_name: "Cardiologia".to_string(),
        topic: "Arritmias".to_string(),
        scheduled_date: ymd(2024, 1, 22),
        original_study_id: 1_640_995_200_000,
    }]
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
