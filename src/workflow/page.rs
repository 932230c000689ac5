//! 页面控制器 - 流程层
//!
//! 核心职责：把一种页面（FormVariant）的表单、级联下拉框、"其他"输入框
//! 和生成流程绑在一起
//!
//! 一次提交的顺序：
//! 1. 校验必填字段与"其他"输入框
//! 2. 组装该页面的请求体
//! 3. 交给 GenerationPipeline

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use crate::error::{AppResult, ValidationError};
use crate::infrastructure::{FormSurface, Severity};
use crate::models::request::{
    EmergencyActivityRequest, ExamRequest, FamilyReportRequest, GenerationRequest, IdeasRequest,
    LearningSituationRequest, MathProblemsRequest, RubricRequest, UnitPlanRequest,
};
use crate::models::{FieldValue, FormVariant};
use crate::services::{parse_positive, validate_form, CascadingSelector, OtherField};
use crate::workflow::app_ctx::AppCtx;
use crate::workflow::layout::{
    PageLayout, TaxonomyKind, FIELD_GRADE, FIELD_LEVEL, FIELD_SUBJECT, FIELD_TOPIC, MATH_LEVEL,
};
use crate::workflow::pipeline::GenerationPipeline;

/// 下载标题中的日期格式
const TITLE_DATE_FORMAT: &str = "%d/%m/%Y";

/// 一个页面
///
/// 每个页面持有自己的生成流程，页面之间不共享文档。
pub struct PageController {
    variant: FormVariant,
    form: Arc<dyn FormSurface>,
    selector: CascadingSelector,
    others: Vec<OtherField>,
    pipeline: GenerationPipeline,
}

impl PageController {
    pub fn new(ctx: &AppCtx, variant: FormVariant, form: Arc<dyn FormSurface>) -> Self {
        let layout = PageLayout::for_variant(variant);
        let taxonomy = match layout.taxonomy {
            TaxonomyKind::Subjects => ctx.subjects.clone(),
            TaxonomyKind::MathTopics => ctx.math_topics.clone(),
        };
        let selector = CascadingSelector::configure(layout.chain, taxonomy)
            .with_fixed_prefix(layout.chain_prefix);

        Self {
            variant,
            pipeline: GenerationPipeline::new(ctx, form.clone()),
            form,
            selector,
            others: layout.others,
        }
    }

    pub fn variant(&self) -> FormVariant {
        self.variant
    }

    pub fn form(&self) -> &Arc<dyn FormSurface> {
        &self.form
    }

    pub fn pipeline(&self) -> &GenerationPipeline {
        &self.pipeline
    }

    /// 页面加载：填充第一个下拉框，锁定其余下拉框，隐藏"其他"输入框
    pub fn mount(&self) {
        self.selector.mount(self.form.as_ref());
        for other in &self.others {
            other.sync(self.form.as_ref());
        }
    }

    /// 模拟用户修改一个字段
    pub fn change(&self, field_id: &str, value: &str) {
        self.form.set_value(field_id, value);
        if self.form.value(field_id) != value {
            warn!("[{}] 字段 {} 不接受值 {:?}", self.variant, field_id, value);
        }
        self.on_change(field_id);
    }

    /// 字段变化后的联动
    pub fn on_change(&self, field_id: &str) {
        let form = self.form.as_ref();
        if self.selector.on_change(form, field_id) {
            // 上级变化会清空下级，下级的"其他"输入框也要跟着收起
            for other in &self.others {
                other.sync(form);
            }
            return;
        }
        for other in &self.others {
            other.on_change(form, field_id);
        }
    }

    /// 按顺序填入一组字段值
    pub fn fill(&self, fields: &[FieldValue]) {
        for field in fields {
            self.change(&field.id, &field.value);
        }
    }

    /// 字段的最终取值（考虑"其他"输入框）
    pub fn effective_value(&self, field_id: &str) -> String {
        self.others
            .iter()
            .find(|o| o.selector_id == field_id)
            .map(|o| o.effective_value(self.form.as_ref()))
            .unwrap_or_else(|| self.form.value(field_id))
    }

    /// 校验并组装请求
    pub fn build_request(&self) -> AppResult<GenerationRequest> {
        let form = self.form.as_ref();
        validate_form(form, &self.others)?;

        let value = |id: &str| form.value(id);
        let nivel = || value(FIELD_LEVEL);
        let curso = || value(FIELD_GRADE);
        let asignatura = || value(FIELD_SUBJECT);

        match self.variant {
            FormVariant::Emergency => GenerationRequest::new(
                self.variant,
                &EmergencyActivityRequest {
                    nivel: nivel(),
                    curso: curso(),
                    asignatura: asignatura(),
                    situacion: value("situacion"),
                    duracion: value("duracion"),
                },
            ),
            FormVariant::MathProblems => {
                let numero_problemas = parse_positive(form, "numeroProblemas")?;
                let contexto = value("contexto").trim().to_string();
                GenerationRequest::new(
                    self.variant,
                    &MathProblemsRequest {
                        nivel: MATH_LEVEL.to_string(),
                        curso: curso(),
                        tematica: self.effective_value(FIELD_TOPIC),
                        dificultad: value("dificultad"),
                        numero_problemas,
                        incluir_soluciones: form.is_checked("incluirSoluciones"),
                        contexto: Some(contexto).filter(|c| !c.is_empty()),
                    },
                )
            }
            FormVariant::UnitPlan => {
                let grupo = value("caracteristicasGrupo").trim().to_string();
                GenerationRequest::new(
                    self.variant,
                    &UnitPlanRequest {
                        nivel: nivel(),
                        curso: curso(),
                        asignatura: asignatura(),
                        tema: value("tema"),
                        caracteristicas_grupo: Some(grupo).filter(|g| !g.is_empty()),
                    },
                )
            }
            FormVariant::Rubric => GenerationRequest::new(
                self.variant,
                &RubricRequest {
                    nivel: nivel(),
                    curso: curso(),
                    asignatura: asignatura(),
                    tema: value("tema"),
                    tipo_evaluacion: value("tipoEvaluacion"),
                },
            ),
            FormVariant::Exam => GenerationRequest::new(
                self.variant,
                &ExamRequest {
                    nivel: nivel(),
                    curso: curso(),
                    asignatura: asignatura(),
                    tema: value("tema"),
                    tipo_examen: value("tipoExamen"),
                    dificultad: value("dificultad"),
                    duracion: value("duracion"),
                },
            ),
            FormVariant::LearningSituation => {
                let duracion_sesiones = parse_positive(form, "duracionSesiones")?;
                let competencias_clave = split_list(&value("competenciasClave"));
                if competencias_clave.is_empty() {
                    form.set_invalid("competenciasClave", true);
                    return Err(ValidationError::MissingFields {
                        fields: vec!["competenciasClave".to_string()],
                    }
                    .into());
                }
                GenerationRequest::new(
                    self.variant,
                    &LearningSituationRequest {
                        nivel: nivel(),
                        curso: curso(),
                        asignatura: asignatura(),
                        contexto: value("contexto"),
                        metodologia: value("metodologia"),
                        duracion_sesiones,
                        competencias_clave,
                    },
                )
            }
            FormVariant::FamilyReport => GenerationRequest::new(
                self.variant,
                &FamilyReportRequest {
                    nivel: nivel(),
                    curso: curso(),
                    asignatura: asignatura(),
                    nombre_alumno: value("nombreAlumno"),
                    aspectos_positivos: value("aspectosPositivos"),
                    aspectos_mejora: value("aspectosMejora"),
                    tono: value("tono"),
                },
            ),
            FormVariant::Ideas => GenerationRequest::new(
                self.variant,
                &IdeasRequest {
                    nivel: nivel(),
                    curso: curso(),
                    asignatura: asignatura(),
                    tema: value("tema"),
                    tipo_actividad: value("tipoActividad"),
                },
            ),
        }
    }

    /// 提交表单
    ///
    /// 校验失败时提示用户，不发出任何请求。
    pub async fn submit(&self) -> AppResult<String> {
        let request = match self.build_request() {
            Ok(request) => request,
            Err(e) => {
                debug!("[{}] 校验未通过: {}", self.variant, e);
                self.pipeline.notify(&e.user_message(), Severity::Error);
                return Err(e);
            }
        };
        self.pipeline.submit(request).await
    }

    /// 按页面规则生成下载标题
    pub fn download_title(&self, date: NaiveDate) -> String {
        let subject = match self.variant {
            FormVariant::MathProblems => format!(
                "{}_{}",
                self.form.value(FIELD_GRADE),
                self.effective_value(FIELD_TOPIC)
            ),
            _ => self.form.value(FIELD_SUBJECT),
        };
        format!(
            "{}_{}_{}",
            self.variant.title_prefix(),
            subject,
            date.format(TITLE_DATE_FORMAT)
        )
    }

    /// 下载最近一次生成的文档，不传标题时按页面规则生成
    pub async fn download(&self, title: Option<&str>) -> AppResult<PathBuf> {
        let title = match title {
            Some(title) => title.to_string(),
            None => self.download_title(Local::now().date_naive()),
        };
        self.pipeline.export(&title).await
    }

    /// "清空" 与 "重新生成" 按钮
    pub fn reset(&self) {
        self.pipeline.reset();
        self.mount();
    }
}

/// 逗号分隔的列表，去掉空项
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::{AppError, MSG_REQUIRED_FIELDS, MSG_SPECIFY_OTHER};
    use crate::infrastructure::{DiskFileSaver, MemoryForm, MemoryNotifier};
    use crate::models::response::{GeneratedDocument, HealthStatus};
    use crate::models::ExportRequest;
    use crate::services::{GenerationApi, OTHER_SENTINEL};
    use crate::workflow::layout::{FIELD_OTHER_CONTAINER, FIELD_OTHER_TOPIC};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingApi {
        bodies: Mutex<Vec<(String, Value)>>,
    }

    #[async_trait]
    impl GenerationApi for RecordingApi {
        async fn generate(&self, request: &GenerationRequest) -> AppResult<GeneratedDocument> {
            self.bodies
                .lock()
                .unwrap()
                .push((request.endpoint().to_string(), request.body().clone()));
            Ok(GeneratedDocument {
                contenido: "# Documento".to_string(),
                proveedor: Some("fake".to_string()),
                modelo: None,
                tiempo_generacion: None,
                tokens_usados: None,
            })
        }

        async fn export_word(&self, _request: &ExportRequest) -> AppResult<Vec<u8>> {
            Ok(Vec::new())
        }

        async fn health(&self) -> AppResult<HealthStatus> {
            unreachable!()
        }
    }

    struct Setup {
        page: PageController,
        form: Arc<MemoryForm>,
        api: Arc<RecordingApi>,
        notifier: Arc<MemoryNotifier>,
    }

    fn setup(variant: FormVariant) -> Setup {
        let api = Arc::new(RecordingApi::default());
        let notifier = Arc::new(MemoryNotifier::new());
        let ctx = AppCtx::new(
            &Config::default(),
            api.clone(),
            notifier.clone(),
            Arc::new(DiskFileSaver::new(std::env::temp_dir())),
        )
        .unwrap();
        let form = Arc::new(PageLayout::for_variant(variant).memory_form());
        let page = PageController::new(&ctx, variant, form.clone());
        page.mount();
        Setup {
            page,
            form,
            api,
            notifier,
        }
    }

    fn choose_chain(page: &PageController, level: &str, grade: &str, subject: &str) {
        page.change(FIELD_LEVEL, level);
        page.change(FIELD_GRADE, grade);
        page.change(FIELD_SUBJECT, subject);
    }

    #[tokio::test]
    async fn test_emergency_payload() {
        let s = setup(FormVariant::Emergency);
        choose_chain(&s.page, "Primaria", "3º de Primaria", "Matemáticas");
        s.page.change("situacion", "Tormenta, no hay luz");
        s.page.change("duracion", "30 minutos");

        s.page.submit().await.unwrap();

        let bodies = s.api.bodies.lock().unwrap().clone();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].0, "/api/emergencia");
        assert_eq!(
            bodies[0].1,
            json!({
                "nivel": "Primaria",
                "curso": "3º de Primaria",
                "asignatura": "Matemáticas",
                "situacion": "Tormenta, no hay luz",
                "duracion": "30 minutos"
            })
        );
    }

    #[tokio::test]
    async fn test_empty_required_field_blocks_submission() {
        let s = setup(FormVariant::Emergency);
        choose_chain(&s.page, "ESO", "1º de ESO", "Música");
        s.page.change("situacion", "Sustitución");

        let err = s.page.submit().await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(s.form.is_invalid("duracion"));
        assert!(s.api.bodies.lock().unwrap().is_empty());
        assert_eq!(s.notifier.last().unwrap().message, MSG_REQUIRED_FIELDS);
    }

    #[tokio::test]
    async fn test_math_payload_uses_other_topic() {
        let s = setup(FormVariant::MathProblems);
        s.page.change(FIELD_GRADE, "4º de Primaria");
        s.page.change(FIELD_TOPIC, OTHER_SENTINEL);
        assert!(s.form.is_visible(FIELD_OTHER_CONTAINER));
        s.page.change(FIELD_OTHER_TOPIC, "  Repartos en el comedor  ");
        s.page.change("numeroProblemas", "3");
        s.page.change("incluirSoluciones", "false");
        s.page.change("contexto", "   ");

        s.page.submit().await.unwrap();

        let body = s.api.bodies.lock().unwrap()[0].1.clone();
        assert_eq!(
            body,
            json!({
                "nivel": "Primaria",
                "curso": "4º de Primaria",
                "tematica": "Repartos en el comedor",
                "dificultad": "Media",
                "numero_problemas": 3,
                "incluir_soluciones": false,
                "contexto": null
            })
        );
    }

    #[tokio::test]
    async fn test_math_other_topic_must_be_specified() {
        let s = setup(FormVariant::MathProblems);
        s.page.change(FIELD_GRADE, "2º de Primaria");
        s.page.change(FIELD_TOPIC, OTHER_SENTINEL);

        let err = s.page.submit().await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Validation(ValidationError::OtherNotSpecified { .. })
        ));
        assert_eq!(s.notifier.last().unwrap().message, MSG_SPECIFY_OTHER);
        assert!(s.form.is_invalid(FIELD_OTHER_TOPIC));

        s.page.change(FIELD_OTHER_TOPIC, "   ");
        let err = s.page.submit().await.unwrap_err();
        assert_eq!(err.user_message(), MSG_SPECIFY_OTHER);
        assert!(s.api.bodies.lock().unwrap().is_empty());
    }

    #[test]
    fn test_grade_change_collapses_other_input() {
        let s = setup(FormVariant::MathProblems);
        s.page.change(FIELD_GRADE, "1º de Primaria");
        s.page.change(FIELD_TOPIC, OTHER_SENTINEL);
        s.page.change(FIELD_OTHER_TOPIC, "algo");

        s.page.change(FIELD_GRADE, "5º de Primaria");

        assert_eq!(s.form.value(FIELD_TOPIC), "");
        assert!(!s.form.is_visible(FIELD_OTHER_CONTAINER));
        assert!(!s.form.is_required(FIELD_OTHER_TOPIC));
        assert_eq!(s.form.value(FIELD_OTHER_TOPIC), "");
    }

    #[test]
    fn test_invalid_number_is_marked() {
        let s = setup(FormVariant::LearningSituation);
        choose_chain(&s.page, "ESO", "3º de ESO", "Física y Química");
        s.page.change("contexto", "Huerto escolar");
        s.page.change("metodologia", "ABP");
        s.page.change("duracionSesiones", "seis");
        s.page.change("competenciasClave", "STEM, CD");

        assert!(s.page.build_request().is_err());
        assert!(s.form.is_invalid("duracionSesiones"));

        s.page.change("duracionSesiones", "6");
        let request = s.page.build_request().unwrap();
        assert_eq!(request.body()["duracion_sesiones"], json!(6));
        assert_eq!(request.body()["competencias_clave"], json!(["STEM", "CD"]));
    }

    #[test]
    fn test_optional_text_becomes_null() {
        let s = setup(FormVariant::UnitPlan);
        choose_chain(&s.page, "Primaria", "6º de Primaria", "Educación Física");
        s.page.change("tema", "Juegos populares");

        let request = s.page.build_request().unwrap();
        assert_eq!(request.endpoint(), "/api/generar/unidad");
        assert_eq!(request.body()["caracteristicas_grupo"], Value::Null);
    }

    #[test]
    fn test_download_titles() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();

        let s = setup(FormVariant::Emergency);
        choose_chain(&s.page, "Primaria", "3º de Primaria", "Matemáticas");
        assert_eq!(
            s.page.download_title(date),
            "Actividad_Emergencia_Matemáticas_17/10/2026"
        );

        let s = setup(FormVariant::MathProblems);
        s.page.change(FIELD_GRADE, "3º de Primaria");
        s.page.change(FIELD_TOPIC, "Perímetros de figuras");
        assert_eq!(
            s.page.download_title(date),
            "Problemas_Matematicas_3º de Primaria_Perímetros de figuras_17/10/2026"
        );
    }

    #[tokio::test]
    async fn test_reset_restores_initial_state() {
        let s = setup(FormVariant::MathProblems);
        s.page.change(FIELD_GRADE, "1º de Primaria");
        s.page.change(FIELD_TOPIC, OTHER_SENTINEL);
        s.page.change("numeroProblemas", "8");

        s.page.reset();

        assert_eq!(s.form.value(FIELD_GRADE), "");
        assert!(s.form.is_enabled(FIELD_GRADE));
        assert_eq!(s.form.option_values(FIELD_GRADE).len(), 6);
        assert!(!s.form.is_enabled(FIELD_TOPIC));
        assert!(!s.form.is_visible(FIELD_OTHER_CONTAINER));
        assert_eq!(s.form.value("numeroProblemas"), "5");
        assert_eq!(s.form.scroll_count(), 1);
    }
}
