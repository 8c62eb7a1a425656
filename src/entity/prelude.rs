//! 预导入模块，方便使用

pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::projects::{
    ActiveModel as ProjectActiveModel, Entity as Projects, Model as ProjectModel,
};
pub use super::registrations::{
    ActiveModel as RegistrationActiveModel, Entity as Registrations, Model as RegistrationModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::units::{ActiveModel as UnitActiveModel, Entity as Units, Model as UnitModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
