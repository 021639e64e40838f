// src/api/dto/incident_dto.rs

use crate::domain::composite::{deserialize_optional_i32_from_string, JsonArray};
use crate::domain::incident_report_model::{self, DEFAULT_STATUS};
use crate::error::{AppError, AppResult};
use crate::utils::datetime::{parse_incident_date, parse_incident_time};
use crate::utils::json_column;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

pub const INVALID_TIME_MESSAGE: &str = "Invalid time format. Please use HH:MM:SS format (24-hour)";
pub const INVALID_DATE_MESSAGE: &str = "Invalid date format. Please use YYYY-MM-DD format";

// 旧フォーム形式を判定するキー
const LEGACY_KEYS: [&str; 8] = [
    "incidentDate",
    "incidentTime",
    "incidentTitle",
    "incidentSummary",
    "weatherCondition",
    "htplShiftInCharge",
    "typeOfIncident",
    "injuredPersonDetails",
];

const REQUIRED_TYPED: [&str; 9] = [
    "incident_date",
    "incident_time",
    "location",
    "weather_condition",
    "htpl_shift_in_charge",
    "incident_reported_by",
    "report_prepared_by",
    "incident_title",
    "incident_summary",
];

const REQUIRED_LEGACY: [&str; 9] = [
    "incidentDate",
    "incidentTime",
    "location",
    "weatherCondition",
    "htplShiftInCharge",
    "incidentReportedBy",
    "reportPreparedBy",
    "incidentTitle",
    "incidentSummary",
];

// --- 種別フラグ ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentType {
    Injury,
    PropertyDamage,
    Fire,
    NearMiss,
    Environment,
    Fatality,
    Other,
}

impl IncidentType {
    /// 表記ゆれを吸収してラベルを解釈（不明なものは Other）
    pub fn from_label(label: &str) -> Self {
        let key: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "injury" | "injuries" => Self::Injury,
            "propertydamage" | "property" => Self::PropertyDamage,
            "fire" => Self::Fire,
            "nearmiss" => Self::NearMiss,
            "environment" | "environmental" => Self::Environment,
            "fatality" | "fatalities" => Self::Fatality,
            _ => Self::Other,
        }
    }

    fn count_column(self) -> &'static str {
        match self {
            Self::Injury => "count_injury",
            Self::PropertyDamage => "count_property_damage",
            Self::Fire => "count_fire",
            Self::NearMiss => "count_near_miss",
            Self::Environment => "count_environment",
            Self::Fatality => "count_fatality",
            Self::Other => "count_other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeFlag {
    pub reported: bool,
    pub count: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentTypes {
    pub injury: TypeFlag,
    pub property_damage: TypeFlag,
    pub fire: TypeFlag,
    pub near_miss: TypeFlag,
    pub environment: TypeFlag,
    pub fatality: TypeFlag,
    pub other: TypeFlag,
}

impl IncidentTypes {
    const ALL: [IncidentType; 7] = [
        IncidentType::Injury,
        IncidentType::PropertyDamage,
        IncidentType::Fire,
        IncidentType::NearMiss,
        IncidentType::Environment,
        IncidentType::Fatality,
        IncidentType::Other,
    ];

    pub fn get(&self, kind: IncidentType) -> TypeFlag {
        match kind {
            IncidentType::Injury => self.injury,
            IncidentType::PropertyDamage => self.property_damage,
            IncidentType::Fire => self.fire,
            IncidentType::NearMiss => self.near_miss,
            IncidentType::Environment => self.environment,
            IncidentType::Fatality => self.fatality,
            IncidentType::Other => self.other,
        }
    }

    fn slot_mut(&mut self, kind: IncidentType) -> &mut TypeFlag {
        match kind {
            IncidentType::Injury => &mut self.injury,
            IncidentType::PropertyDamage => &mut self.property_damage,
            IncidentType::Fire => &mut self.fire,
            IncidentType::NearMiss => &mut self.near_miss,
            IncidentType::Environment => &mut self.environment,
            IncidentType::Fatality => &mut self.fatality,
            IncidentType::Other => &mut self.other,
        }
    }

    fn set(&mut self, kind: IncidentType, reported: Option<bool>, count: Option<i32>) {
        let slot = self.slot_mut(kind);
        slot.reported = reported.unwrap_or(false);
        slot.count = count.unwrap_or(0);
    }

    fn add(&mut self, kind: IncidentType, count: i32) {
        let slot = self.slot_mut(kind);
        slot.count = slot.count.saturating_add(count);
        slot.reported = slot.reported || count > 0;
    }

    fn ensure_non_negative(&self) -> AppResult<()> {
        let negative: Vec<String> = Self::ALL
            .iter()
            .filter(|kind| self.get(**kind).count < 0)
            .map(|kind| format!("{}: must be a non-negative number", kind.count_column()))
            .collect();

        if negative.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationErrors(negative))
        }
    }
}

// --- 作成リクエスト ---

/// 正規化済みの新規インシデント
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncident {
    pub incident_date: NaiveDate,
    pub incident_time: NaiveTime,
    pub location: String,
    pub weather_condition: String,
    pub htpl_shift_in_charge: String,
    pub contractor_supervisor: Option<String>,
    pub incident_reported_by: String,
    pub report_prepared_by: String,
    pub created_by: Option<String>,
    pub incident_title: String,
    pub incident_summary: String,
    pub types: IncidentTypes,
    pub injured_htpl_employees: JsonArray,
    pub injured_contract_workers: JsonArray,
    pub injured_visitors: JsonArray,
    pub uploaded_files: JsonArray,
    pub status: String,
}

/// 型付き（snake_case）の作成リクエスト
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateIncidentRequest {
    pub incident_date: Option<String>,
    pub incident_time: Option<String>,
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub location: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub weather_condition: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub htpl_shift_in_charge: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub contractor_supervisor: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub incident_reported_by: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub report_prepared_by: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub created_by: Option<String>,
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub incident_title: Option<String>,
    pub incident_summary: Option<String>,

    pub type_injury: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_optional_i32_from_string")]
    pub count_injury: Option<i32>,
    pub type_property_damage: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_optional_i32_from_string")]
    pub count_property_damage: Option<i32>,
    pub type_fire: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_optional_i32_from_string")]
    pub count_fire: Option<i32>,
    pub type_near_miss: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_optional_i32_from_string")]
    pub count_near_miss: Option<i32>,
    pub type_environment: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_optional_i32_from_string")]
    pub count_environment: Option<i32>,
    pub type_fatality: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_optional_i32_from_string")]
    pub count_fatality: Option<i32>,
    pub type_other: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_optional_i32_from_string")]
    pub count_other: Option<i32>,

    pub injured_htpl_employees: Option<JsonArray>,
    pub injured_contract_workers: Option<JsonArray>,
    pub injured_visitors: Option<JsonArray>,
    pub uploaded_files: Option<JsonArray>,
    #[validate(length(max = 20, message = "must be at most 20 characters"))]
    pub status: Option<String>,
}

/// 旧フォーム形式の種別指定（名前の配列、または名前→件数）
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LegacyIncidentTypes {
    Names(Vec<String>),
    Counts(Map<String, Value>),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyInjuredDetails {
    #[serde(alias = "htplEmployees")]
    pub employees: Option<JsonArray>,
    pub contract_workers: Option<JsonArray>,
    pub visitors: Option<JsonArray>,
}

/// 旧フォーム形式（camelCase）の作成リクエスト
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LegacyIncidentRequest {
    pub incident_date: Option<String>,
    pub incident_time: Option<String>,
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub location: Option<String>,
    #[serde(alias = "weather")]
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub weather_condition: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub htpl_shift_in_charge: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub contractor_supervisor: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub incident_reported_by: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub report_prepared_by: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub created_by: Option<String>,
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub incident_title: Option<String>,
    pub incident_summary: Option<String>,
    pub type_of_incident: Option<LegacyIncidentTypes>,
    pub injured_person_details: Option<LegacyInjuredDetails>,
    pub uploaded_files: Option<JsonArray>,
    #[validate(length(max = 20, message = "must be at most 20 characters"))]
    pub status: Option<String>,
}

/// 作成リクエスト（どちらの形式でも受け付ける）
#[derive(Debug, Clone)]
pub enum CreateIncidentPayload {
    Typed(CreateIncidentRequest),
    Legacy(LegacyIncidentRequest),
}

impl CreateIncidentPayload {
    /// リクエストボディから形式を判定してデシリアライズ
    pub fn from_json(body: Value) -> AppResult<Self> {
        let Some(object) = body.as_object() else {
            return Err(AppError::BadRequest(
                "Request body must be a JSON object".to_string(),
            ));
        };

        let is_legacy = LEGACY_KEYS.iter().any(|key| object.contains_key(*key));

        let parsed = if is_legacy {
            serde_json::from_value(body).map(Self::Legacy)
        } else {
            serde_json::from_value(body).map(Self::Typed)
        };

        parsed.map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }

    /// 必須項目・日付時刻・件数を検証して正規化
    pub fn into_new_incident(self) -> AppResult<NewIncident> {
        let draft = match self {
            Self::Typed(request) => {
                request.validate()?;
                IncidentDraft::from_typed(request)
            }
            Self::Legacy(request) => {
                request.validate()?;
                IncidentDraft::from_legacy(request)?
            }
        };
        draft.finish()
    }
}

// 両形式の共通中間表現
struct IncidentDraft {
    required_names: &'static [&'static str; 9],
    required: [Option<String>; 9],
    contractor_supervisor: Option<String>,
    created_by: Option<String>,
    types: IncidentTypes,
    injured_htpl_employees: JsonArray,
    injured_contract_workers: JsonArray,
    injured_visitors: JsonArray,
    uploaded_files: JsonArray,
    status: Option<String>,
}

impl IncidentDraft {
    fn from_typed(r: CreateIncidentRequest) -> Self {
        let mut types = IncidentTypes::default();
        types.set(IncidentType::Injury, r.type_injury, r.count_injury);
        types.set(IncidentType::PropertyDamage, r.type_property_damage, r.count_property_damage);
        types.set(IncidentType::Fire, r.type_fire, r.count_fire);
        types.set(IncidentType::NearMiss, r.type_near_miss, r.count_near_miss);
        types.set(IncidentType::Environment, r.type_environment, r.count_environment);
        types.set(IncidentType::Fatality, r.type_fatality, r.count_fatality);
        types.set(IncidentType::Other, r.type_other, r.count_other);

        Self {
            required_names: &REQUIRED_TYPED,
            required: [
                r.incident_date,
                r.incident_time,
                r.location,
                r.weather_condition,
                r.htpl_shift_in_charge,
                r.incident_reported_by,
                r.report_prepared_by,
                r.incident_title,
                r.incident_summary,
            ],
            contractor_supervisor: r.contractor_supervisor,
            created_by: r.created_by,
            types,
            injured_htpl_employees: r.injured_htpl_employees.unwrap_or_default(),
            injured_contract_workers: r.injured_contract_workers.unwrap_or_default(),
            injured_visitors: r.injured_visitors.unwrap_or_default(),
            uploaded_files: r.uploaded_files.unwrap_or_default(),
            status: r.status,
        }
    }

    fn from_legacy(r: LegacyIncidentRequest) -> AppResult<Self> {
        let mut types = IncidentTypes::default();
        match r.type_of_incident {
            Some(LegacyIncidentTypes::Names(names)) => {
                for name in names.iter().filter(|n| !n.trim().is_empty()) {
                    types.add(IncidentType::from_label(name), 1);
                }
            }
            Some(LegacyIncidentTypes::Counts(counts)) => {
                for (label, value) in &counts {
                    let kind = IncidentType::from_label(label);
                    match value {
                        Value::Bool(reported) => types.slot_mut(kind).reported |= *reported,
                        Value::Null => {}
                        other => types.add(kind, legacy_count(label, other)?),
                    }
                }
            }
            None => {}
        }

        let injured = r.injured_person_details.unwrap_or_default();

        Ok(Self {
            required_names: &REQUIRED_LEGACY,
            required: [
                r.incident_date,
                r.incident_time,
                r.location,
                r.weather_condition,
                r.htpl_shift_in_charge,
                r.incident_reported_by,
                r.report_prepared_by,
                r.incident_title,
                r.incident_summary,
            ],
            contractor_supervisor: r.contractor_supervisor,
            created_by: r.created_by,
            types,
            injured_htpl_employees: injured.employees.unwrap_or_default(),
            injured_contract_workers: injured.contract_workers.unwrap_or_default(),
            injured_visitors: injured.visitors.unwrap_or_default(),
            uploaded_files: r.uploaded_files.unwrap_or_default(),
            status: r.status,
        })
    }

    fn finish(self) -> AppResult<NewIncident> {
        let missing: Vec<String> = self
            .required_names
            .iter()
            .zip(self.required.iter())
            .filter(|(_, value)| non_blank(value.as_deref()).is_none())
            .map(|(name, _)| name.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(AppError::MissingFields(missing));
        }

        let [date, time, location, weather, shift, reported_by, prepared_by, title, summary] = self
            .required
            .map(|value| value.unwrap_or_default().trim().to_string());

        let incident_time = parse_incident_time(&time)
            .ok_or_else(|| AppError::ValidationError(INVALID_TIME_MESSAGE.to_string()))?;
        let incident_date = parse_incident_date(&date)
            .ok_or_else(|| AppError::ValidationError(INVALID_DATE_MESSAGE.to_string()))?;

        self.types.ensure_non_negative()?;

        Ok(NewIncident {
            incident_date,
            incident_time,
            location,
            weather_condition: weather,
            htpl_shift_in_charge: shift,
            contractor_supervisor: non_blank(self.contractor_supervisor.as_deref()),
            incident_reported_by: reported_by,
            report_prepared_by: prepared_by,
            created_by: non_blank(self.created_by.as_deref()),
            incident_title: title,
            incident_summary: summary,
            types: self.types,
            injured_htpl_employees: self.injured_htpl_employees,
            injured_contract_workers: self.injured_contract_workers,
            injured_visitors: self.injured_visitors,
            uploaded_files: self.uploaded_files,
            status: non_blank(self.status.as_deref()).unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        })
    }
}

fn legacy_count(label: &str, value: &Value) -> AppResult<i32> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) if s.trim().is_empty() => Some(0),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| {
            AppError::ValidationError(format!("typeOfIncident.{}: count must be a number", label))
        })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentResponse {
    pub message: String,
    pub incident_id: i32,
    pub timestamp: DateTime<Utc>,
}

// --- レスポンス ---

/// インシデント（JSON列はデコード済み）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncidentResponse {
    pub incident_id: i32,
    pub incident_date: NaiveDate,
    pub incident_time: NaiveTime,
    pub location: String,
    pub weather_condition: String,
    pub htpl_shift_in_charge: String,
    pub contractor_supervisor: Option<String>,
    pub incident_reported_by: String,
    pub report_prepared_by: String,
    pub created_by: Option<String>,
    pub incident_title: String,
    pub incident_summary: String,
    pub type_injury: bool,
    pub count_injury: i32,
    pub type_property_damage: bool,
    pub count_property_damage: i32,
    pub type_fire: bool,
    pub count_fire: i32,
    pub type_near_miss: bool,
    pub count_near_miss: i32,
    pub type_environment: bool,
    pub count_environment: i32,
    pub type_fatality: bool,
    pub count_fatality: i32,
    pub type_other: bool,
    pub count_other: i32,
    pub injured_htpl_employees: JsonArray,
    pub injured_contract_workers: JsonArray,
    pub injured_visitors: JsonArray,
    pub uploaded_files: JsonArray,
    pub training_type_required: Option<String>,
    pub training_description: Option<String>,
    pub training_updated_by: Option<String>,
    pub training_updated_on: Option<DateTime<Utc>>,
    pub status: String,
    pub created_on: DateTime<Utc>,
}

impl From<incident_report_model::Model> for IncidentResponse {
    fn from(m: incident_report_model::Model) -> Self {
        Self {
            injured_htpl_employees: json_column::decode_or_default(
                m.injured_htpl_employees.as_deref(),
                "injured_htpl_employees",
            ),
            injured_contract_workers: json_column::decode_or_default(
                m.injured_contract_workers.as_deref(),
                "injured_contract_workers",
            ),
            injured_visitors: json_column::decode_or_default(
                m.injured_visitors.as_deref(),
                "injured_visitors",
            ),
            uploaded_files: json_column::decode_or_default(
                m.uploaded_files.as_deref(),
                "uploaded_files",
            ),
            incident_id: m.incident_id,
            incident_date: m.incident_date,
            incident_time: m.incident_time,
            location: m.location,
            weather_condition: m.weather_condition,
            htpl_shift_in_charge: m.htpl_shift_in_charge,
            contractor_supervisor: m.contractor_supervisor,
            incident_reported_by: m.incident_reported_by,
            report_prepared_by: m.report_prepared_by,
            created_by: m.created_by,
            incident_title: m.incident_title,
            incident_summary: m.incident_summary,
            type_injury: m.type_injury,
            count_injury: m.count_injury,
            type_property_damage: m.type_property_damage,
            count_property_damage: m.count_property_damage,
            type_fire: m.type_fire,
            count_fire: m.count_fire,
            type_near_miss: m.type_near_miss,
            count_near_miss: m.count_near_miss,
            type_environment: m.type_environment,
            count_environment: m.count_environment,
            type_fatality: m.type_fatality,
            count_fatality: m.count_fatality,
            type_other: m.type_other,
            count_other: m.count_other,
            training_type_required: m.training_type_required,
            training_description: m.training_description,
            training_updated_by: m.training_updated_by,
            training_updated_on: m.training_updated_on,
            status: m.status,
            created_on: m.created_on,
        }
    }
}

// --- 教育情報の更新 ---

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTrainingRequest {
    #[serde(alias = "trainingTypeRequired")]
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub training_type_required: Option<String>,

    #[serde(alias = "trainingDescription")]
    pub training_description: Option<String>,

    #[serde(alias = "updatedBy")]
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub updated_by: Option<String>,
}

/// 正規化済みの教育情報更新（None の項目は既存値を維持）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingUpdate {
    pub training_type_required: Option<String>,
    pub training_description: Option<String>,
    pub updated_by: String,
}

pub const DEFAULT_UPDATED_BY: &str = "System";

impl UpdateTrainingRequest {
    pub fn into_update(self) -> AppResult<TrainingUpdate> {
        self.validate()?;

        let training_type_required = non_blank(self.training_type_required.as_deref());
        let training_description = non_blank(self.training_description.as_deref());

        if training_type_required.is_none() && training_description.is_none() {
            return Err(AppError::ValidationError(
                "At least one of training_type_required or training_description must be provided"
                    .to_string(),
            ));
        }

        Ok(TrainingUpdate {
            training_type_required,
            training_description,
            updated_by: non_blank(self.updated_by.as_deref())
                .unwrap_or_else(|| DEFAULT_UPDATED_BY.to_string()),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrainingResponse {
    pub message: String,
    pub incident_id: i32,
    pub email_sent: bool,
}
