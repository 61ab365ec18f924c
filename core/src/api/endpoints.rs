//! Resource paths of the REST API, relative to the API base.

use urlencoding::encode;

pub fn login() -> String {
    "login".to_string()
}

/// Create target of `POST`; `class(id)` is the update and delete target.
pub fn classes() -> String {
    "turmas".to_string()
}

pub fn class(class_id: &str) -> String {
    format!("turmas/{}", encode(class_id))
}

pub fn class_roster(class_id: &str) -> String {
    format!("turmas/{}/alunos", encode(class_id))
}

pub fn enroll_student(class_id: &str) -> String {
    format!("turmas/{}/adicionar_aluno", encode(class_id))
}

pub fn unenroll_student(class_id: &str, student_id: &str) -> String {
    format!("turmas/{}/aluno/{}", encode(class_id), encode(student_id))
}

pub fn class_report(class_id: &str) -> String {
    format!("relatorios/turma/{}/pdf", encode(class_id))
}

pub fn class_list(user_id: &str, role: &str) -> String {
    format!("turmas?userId={}&role={}", encode(user_id), encode(role))
}

pub fn teacher_summary() -> String {
    "dashboard/resumo".to_string()
}

pub fn student_summary() -> String {
    "dashboard/resumo/aluno".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(classes(), "turmas");
        assert_eq!(class("12"), "turmas/12");
        assert_eq!(class_roster("12"), "turmas/12/alunos");
        assert_eq!(unenroll_student("12", "5"), "turmas/12/aluno/5");
        assert_eq!(class_report("12"), "relatorios/turma/12/pdf");
        assert_eq!(class_list("4", "teacher"), "turmas?userId=4&role=teacher");
    }

    #[test]
    fn test_ids_are_escaped() {
        assert_eq!(class("a/b"), "turmas/a%2Fb");
        assert_eq!(class_list("1&role=x", "student"), "turmas?userId=1%26role%3Dx&role=student");
    }
}
