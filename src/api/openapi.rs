//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use domain::{
    Address, Agreement, Complaint, ComplaintCategory, ComplaintChanges,
    ComplaintStatus, ComplaintView, Contact, EmergencyContact, Furnishing, IdProof, IdProofKind,
    Image, NewComplaint, NewNotice, NewPayment, NewProperty, NewRoom, NewTenant, Notice,
    NoticeCategory, NoticeChanges, NoticePeriod, NoticeStatus, Occupation, OccupationKind,
    Payment, PaymentChanges, PaymentMethod, PaymentStatus, Priority, Property, PropertyAmenities,
    PropertyChanges, PropertyStatus, PropertyType, PropertyView, ReadReceipt, Room,
    RoomAmenities, RoomChanges, RoomStatus, RoomType, RoomView, TargetAudience, Tenant,
    TenantChanges, TenantStatus, TenantView, TimelineEntry, UserResponse, UserRole,
};

use crate::api::handlers::{
    auth_handler, complaint_handler, dashboard_handler, notice_handler, payment_handler,
    property_handler, room_handler, tenant_handler, user_handler,
};
use crate::errors::FieldError;
use crate::services::{
    AuthSession, DashboardStats, LoginRequest, PaymentSummary, PortfolioStats, RegisterRequest,
    TenancyStats, TokenResponse,
};

/// OpenAPI documentation for PG Nexus
#[derive(OpenApi)]
#[openapi(
    info(
        title = "PG Nexus API",
        version = "0.1.0",
        description = "Paying-guest hostel management: properties, rooms, tenants, payments, complaints and notices",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::refresh_token,
        auth_handler::forgot_password,
        auth_handler::reset_password,
        auth_handler::verify_email,
        auth_handler::me,
        auth_handler::logout,
        // User endpoints
        user_handler::list_users,
        user_handler::get_user,
        // Property endpoints
        property_handler::list_properties,
        property_handler::get_property,
        property_handler::create_property,
        property_handler::update_property,
        property_handler::delete_property,
        property_handler::upload_images,
        // Room endpoints
        room_handler::list_rooms,
        room_handler::get_room,
        room_handler::create_room,
        room_handler::update_room,
        room_handler::delete_room,
        // Tenant endpoints
        tenant_handler::list_tenants,
        tenant_handler::get_tenant,
        tenant_handler::create_tenant,
        tenant_handler::update_tenant,
        tenant_handler::delete_tenant,
        // Payment endpoints
        payment_handler::list_payments,
        payment_handler::get_payment,
        payment_handler::create_payment,
        payment_handler::update_payment,
        payment_handler::delete_payment,
        // Complaint endpoints
        complaint_handler::list_complaints,
        complaint_handler::get_complaint,
        complaint_handler::create_complaint,
        complaint_handler::update_complaint,
        complaint_handler::delete_complaint,
        // Notice endpoints
        notice_handler::list_notices,
        notice_handler::get_notice,
        notice_handler::create_notice,
        notice_handler::update_notice,
        notice_handler::delete_notice,
        notice_handler::mark_notice_read,
        // Dashboard
        dashboard_handler::stats,
    ),
    components(
        schemas(
            // Users and auth
            UserRole,
            UserResponse,
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            AuthSession,
            auth_handler::RefreshTokenRequest,
            auth_handler::ForgotPasswordRequest,
            auth_handler::ResetPasswordRequest,
            // Shared value objects
            Address,
            Image,
            Priority,
            FieldError,
            // Properties
            Property,
            PropertyView,
            PropertyType,
            PropertyStatus,
            PropertyAmenities,
            Contact,
            NewProperty,
            PropertyChanges,
            property_handler::ImagesUpload,
            // Rooms
            Room,
            RoomView,
            RoomType,
            RoomStatus,
            RoomAmenities,
            Furnishing,
            NewRoom,
            RoomChanges,
            // Tenants
            Tenant,
            TenantView,
            TenantStatus,
            EmergencyContact,
            IdProof,
            IdProofKind,
            Occupation,
            OccupationKind,
            NoticePeriod,
            Agreement,
            NewTenant,
            TenantChanges,
            // Payments
            Payment,
            PaymentStatus,
            PaymentMethod,
            NewPayment,
            PaymentChanges,
            // Complaints
            Complaint,
            ComplaintView,
            ComplaintCategory,
            ComplaintStatus,
            TimelineEntry,
            NewComplaint,
            ComplaintChanges,
            // Notices
            Notice,
            NoticeCategory,
            NoticeStatus,
            TargetAudience,
            ReadReceipt,
            NewNotice,
            NoticeChanges,
            // Dashboard
            DashboardStats,
            PortfolioStats,
            TenancyStats,
            PaymentSummary,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and account recovery"),
        (name = "Users", description = "User administration"),
        (name = "Properties", description = "Hostel properties and their images"),
        (name = "Rooms", description = "Rooms and their occupancy"),
        (name = "Tenants", description = "Tenant placements"),
        (name = "Payments", description = "Monthly rent payments"),
        (name = "Complaints", description = "Maintenance complaints"),
        (name = "Notices", description = "Announcements"),
        (name = "Dashboard", description = "Role-dependent statistics")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
