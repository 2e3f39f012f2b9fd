use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudentType {
    Regular,
    Residential,
    #[serde(rename = "Lillah Boarding")]
    LillahBoarding,
}

impl StudentType {
    /// Only residential and lillah boarding students may occupy a hostel bed.
    pub fn is_hostel_eligible(self) -> bool {
        matches!(self, StudentType::Residential | StudentType::LillahBoarding)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section {
    A,
    B,
    C,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraFee {
    pub description: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub department: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub section: Section,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub admission_date: NaiveDate,
    pub student_type: StudentType,
    pub tuition_fee: i64,
    pub hostel_fee: i64,
    #[serde(default)]
    pub extra_fees: Vec<ExtraFee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaffType {
    Regular,
    Residential,
}

/// Positive for bonuses, negative for deductions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryAdjustment {
    pub description: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub subject_id: String,
    pub phone: String,
    pub email: String,
    pub joining_date: NaiveDate,
    #[serde(rename = "type")]
    pub staff_type: StaffType,
    pub base_salary: i64,
    #[serde(default)]
    pub residential_deduction: i64,
    #[serde(default)]
    pub adjustments: Vec<SalaryAdjustment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmployeeRole {
    Accountant,
    #[serde(rename = "Admin Staff")]
    AdminStaff,
    Cleaner,
    #[serde(rename = "Security Guard")]
    SecurityGuard,
}

impl EmployeeRole {
    pub fn label(self) -> &'static str {
        match self {
            EmployeeRole::Accountant => "Accountant",
            EmployeeRole::AdminStaff => "Admin Staff",
            EmployeeRole::Cleaner => "Cleaner",
            EmployeeRole::SecurityGuard => "Security Guard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub role: EmployeeRole,
    pub phone: String,
    pub email: String,
    pub joining_date: NaiveDate,
    #[serde(rename = "type")]
    pub staff_type: StaffType,
    pub salary: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub room_number: String,
    pub capacity: u32,
    /// Insertion order is display order. Never holds duplicates.
    #[serde(default)]
    pub student_ids: Vec<String>,
}

impl Room {
    pub fn contains(&self, student_id: &str) -> bool {
        self.student_ids.iter().any(|id| id == student_id)
    }

    /// Every roster entry holds a bed, including ids that no longer resolve
    /// to an eligible student.
    pub fn beds_taken(&self) -> usize {
        self.student_ids.len()
    }

    pub fn has_spare_bed(&self) -> bool {
        self.beds_taken() < self.capacity as usize
    }
}

/// Teachers and employees seen through the fields the warden screens use.
pub trait StaffMember {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn staff_type(&self) -> StaffType;
    fn phone(&self) -> &str;
    fn email(&self) -> &str;
    fn role_label(&self) -> &str;

    fn is_residential(&self) -> bool {
        self.staff_type() == StaffType::Residential
    }
}

impl StaffMember for Teacher {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn staff_type(&self) -> StaffType {
        self.staff_type
    }
    fn phone(&self) -> &str {
        &self.phone
    }
    fn email(&self) -> &str {
        &self.email
    }
    fn role_label(&self) -> &str {
        "Teacher"
    }
}

impl StaffMember for Employee {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn staff_type(&self) -> StaffType {
        self.staff_type
    }
    fn phone(&self) -> &str {
        &self.phone
    }
    fn email(&self) -> &str {
        &self.email
    }
    fn role_label(&self) -> &str {
        self.role.label()
    }
}

/// The whole in-memory institution. Single owner of every collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub warden_ids: BTreeSet<String>,
}
