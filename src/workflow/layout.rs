//! 各页面的表单布局
//!
//! 字段 id 与页面元素保持一致，提交文件（TOML）也按这些 id 填写

use crate::infrastructure::{FieldSpec, MemoryForm};
use crate::models::FormVariant;
use crate::services::{ChainField, OtherField, OTHER_SENTINEL};

pub const FIELD_LEVEL: &str = "nivel";
pub const FIELD_GRADE: &str = "curso";
pub const FIELD_SUBJECT: &str = "asignatura";
pub const FIELD_TOPIC: &str = "tematica";
pub const FIELD_OTHER_CONTAINER: &str = "otroContainer";
pub const FIELD_OTHER_TOPIC: &str = "otraTematica";

/// 数学页面固定的学段
pub const MATH_LEVEL: &str = "Primaria";

const DIFFICULTIES: &[&str] = &["Fácil", "Media", "Difícil"];
const EXAM_TYPES: &[&str] = &["Test", "Desarrollo", "Mixto"];
const REPORT_TONES: &[&str] = &["Formal", "Cercano", "Motivador"];

/// 级联下拉框使用哪张分类表
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxonomyKind {
    Subjects,
    MathTopics,
}

/// 一个页面的完整布局
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub fields: Vec<FieldSpec>,
    pub chain: Vec<ChainField>,
    pub taxonomy: TaxonomyKind,
    /// 级联时固定在最前面的键
    pub chain_prefix: &'static [&'static str],
    pub others: Vec<OtherField>,
}

impl PageLayout {
    pub fn for_variant(variant: FormVariant) -> Self {
        match variant {
            FormVariant::MathProblems => math_layout(),
            other => subject_layout(extra_fields(other)),
        }
    }

    /// 按布局创建内存表单
    pub fn memory_form(&self) -> MemoryForm {
        MemoryForm::new(self.fields.iter().cloned())
    }
}

/// 学段 → 年级 → 科目
fn subject_chain() -> Vec<ChainField> {
    vec![
        ChainField::new(FIELD_LEVEL, "Selecciona un nivel", "Selecciona un nivel"),
        ChainField::new(FIELD_GRADE, "Selecciona un curso", "Selecciona primero un nivel"),
        ChainField::new(
            FIELD_SUBJECT,
            "Selecciona una asignatura",
            "Selecciona primero un curso",
        ),
    ]
}

fn subject_layout(extra: Vec<FieldSpec>) -> PageLayout {
    let fields = [
        FieldSpec::select(FIELD_LEVEL).required(),
        FieldSpec::select(FIELD_GRADE).required(),
        FieldSpec::select(FIELD_SUBJECT).required(),
    ]
    .into_iter()
    .chain(extra)
    .collect();

    PageLayout {
        fields,
        chain: subject_chain(),
        taxonomy: TaxonomyKind::Subjects,
        chain_prefix: &[],
        others: Vec::new(),
    }
}

fn extra_fields(variant: FormVariant) -> Vec<FieldSpec> {
    match variant {
        FormVariant::Emergency => vec![
            FieldSpec::text("situacion").required(),
            FieldSpec::text("duracion").required(),
        ],
        FormVariant::UnitPlan => vec![
            FieldSpec::text("tema").required(),
            FieldSpec::text("caracteristicasGrupo"),
        ],
        FormVariant::Rubric => vec![
            FieldSpec::text("tema").required(),
            FieldSpec::text("tipoEvaluacion").required(),
        ],
        FormVariant::Exam => vec![
            FieldSpec::text("tema").required(),
            FieldSpec::select("tipoExamen")
                .required()
                .with_choices("Selecciona un tipo", EXAM_TYPES),
            FieldSpec::select("dificultad")
                .required()
                .with_choices("Selecciona la dificultad", DIFFICULTIES),
            FieldSpec::text("duracion").required(),
        ],
        FormVariant::LearningSituation => vec![
            FieldSpec::text("contexto").required(),
            FieldSpec::text("metodologia").required(),
            FieldSpec::text("duracionSesiones").required(),
            FieldSpec::text("competenciasClave").required(),
        ],
        FormVariant::FamilyReport => vec![
            FieldSpec::text("nombreAlumno").required(),
            FieldSpec::text("aspectosPositivos").required(),
            FieldSpec::text("aspectosMejora").required(),
            FieldSpec::select("tono")
                .required()
                .with_choices("Selecciona un tono", REPORT_TONES)
                .with_default("Formal"),
        ],
        FormVariant::Ideas => vec![
            FieldSpec::text("tema").required(),
            FieldSpec::text("tipoActividad").required(),
        ],
        FormVariant::MathProblems => Vec::new(),
    }
}

/// 年级 → 主题（学段固定为 Primaria）
fn math_layout() -> PageLayout {
    PageLayout {
        fields: vec![
            FieldSpec::select(FIELD_GRADE).required(),
            FieldSpec::select(FIELD_TOPIC).required(),
            FieldSpec::container(FIELD_OTHER_CONTAINER),
            FieldSpec::text(FIELD_OTHER_TOPIC),
            FieldSpec::select("dificultad")
                .required()
                .with_choices("Selecciona la dificultad", DIFFICULTIES)
                .with_default("Media"),
            FieldSpec::text("numeroProblemas").required().with_default("5"),
            FieldSpec::checkbox("incluirSoluciones").with_default("true"),
            FieldSpec::text("contexto"),
        ],
        chain: vec![
            ChainField::new(FIELD_GRADE, "Selecciona un curso", "Selecciona un curso"),
            ChainField::new(
                FIELD_TOPIC,
                "Selecciona una temática",
                "Selecciona primero un curso",
            ),
        ],
        taxonomy: TaxonomyKind::MathTopics,
        chain_prefix: &[MATH_LEVEL],
        others: vec![OtherField::configure(
            FIELD_TOPIC,
            FIELD_OTHER_CONTAINER,
            FIELD_OTHER_TOPIC,
            OTHER_SENTINEL,
        )],
    }
}
