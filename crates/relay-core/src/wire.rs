//! Protobuf wire messages exchanged with the host over the service socket.
//!
//! Fields the receiver must be able to see as absent are proto2-style
//! `optional`; everything else decodes to its zero value when missing.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum NotificationCode {
    Unspecified = 0,
    Post = 1,
    Cancel = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ServiceCode {
    Unspecified = 0,
    BootCompleted = 1,
    Notification = 2,
    SwitchContainer = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum HostCode {
    Unspecified = 0,
    Suspend = 1,
    Resume = 2,
    Shutdown = 3,
    Notification = 4,
    AirplaneModeChanged = 5,
    WifiUserEnabledChanged = 6,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContainerNotification {
    #[prost(enumeration = "NotificationCode", optional, tag = "1")]
    pub code: ::core::option::Option<i32>,
    #[prost(int32, optional, tag = "2")]
    pub id: ::core::option::Option<i32>,
    #[prost(string, optional, tag = "3")]
    pub tag: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "4")]
    pub pkg_name: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(uint64, tag = "5")]
    pub timestamp: u64,
    #[prost(bool, tag = "6")]
    pub no_clear: bool,
    #[prost(string, tag = "7")]
    pub title: ::prost::alloc::string::String,
    #[prost(string, tag = "8")]
    pub text: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "9")]
    pub original_icon: ::prost::alloc::vec::Vec<u8>,
    #[prost(uint32, tag = "10")]
    pub original_icon_width: u32,
    #[prost(uint32, tag = "11")]
    pub original_icon_height: u32,
    #[prost(bytes = "vec", tag = "12")]
    pub custom_notification: ::prost::alloc::vec::Vec<u8>,
    #[prost(uint32, tag = "13")]
    pub custom_notification_width: u32,
    #[prost(uint32, tag = "14")]
    pub custom_notification_height: u32,
    #[prost(bool, tag = "15")]
    pub is_base: bool,
    #[prost(string, optional, tag = "16")]
    pub custom_icon: ::core::option::Option<::prost::alloc::string::String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServiceToCmldMessage {
    #[prost(enumeration = "ServiceCode", optional, tag = "1")]
    pub code: ::core::option::Option<i32>,
    #[prost(message, optional, tag = "2")]
    pub notification: ::core::option::Option<ContainerNotification>,
    #[prost(string, optional, tag = "3")]
    pub target_container: ::core::option::Option<::prost::alloc::string::String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CmldToServiceMessage {
    #[prost(enumeration = "HostCode", optional, tag = "1")]
    pub code: ::core::option::Option<i32>,
    #[prost(string, optional, tag = "2")]
    pub source_id: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(string, optional, tag = "3")]
    pub source_color: ::core::option::Option<::prost::alloc::string::String>,
    #[prost(message, optional, tag = "4")]
    pub notification: ::core::option::Option<ContainerNotification>,
    #[prost(bool, tag = "5")]
    pub airplane_mode: bool,
    #[prost(bool, tag = "6")]
    pub wifi_user_enabled: bool,
}
