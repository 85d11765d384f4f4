use utoipa::OpenApi;
use crate::controllers::analysis_controller;
use crate::models::feasibility;
use crate::services::tariff;

#[derive(OpenApi)]
#[openapi(
    paths(
        analysis_controller::analyze_full,
        analysis_controller::calculate_roi,
        analysis_controller::list_districts,
        analysis_controller::get_tariffs,
        analysis_controller::health
    ),
    components(
        schemas(
            feasibility::AnalyzeRequest,
            feasibility::RoiRequest,
            feasibility::AnalysisResponse,
            feasibility::RoofAnalysis,
            feasibility::RoofMeasurement,
            feasibility::Coordinates,
            feasibility::ConnectionPhase,
            feasibility::IrradianceReading,
            feasibility::FinancialProjection,
            feasibility::HealthStatus,
            tariff::TariffScheduleView,
            tariff::TariffBracketView,
            tariff::DistrictSunHours
        )
    ),
    tags(
        (name = "rooftop-solar", description = "Rooftop Solar Feasibility & ROI API")
    )
)]
pub struct ApiDoc;
