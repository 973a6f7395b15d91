pub mod city_detail_model;
pub mod city_list_model;

pub use city_detail_model::CityDetailModel;
pub use city_list_model::CityListModel;
