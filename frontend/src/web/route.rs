//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性。

use std::fmt::Display;

use manhaj_shared::CourseId;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面
    #[default]
    Login,
    /// 课程列表 (首页)
    Courses,
    /// 课程结构编辑器
    CourseEditor(CourseId),
    /// 课程播放
    CoursePlayer(CourseId),
    Profile,
    Pricing,
    Payments,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Self::Courses,
            ["login"] => Self::Login,
            ["profile"] => Self::Profile,
            ["pricing"] => Self::Pricing,
            ["payments"] => Self::Payments,
            ["courses", id, action] => match (id.parse::<CourseId>(), *action) {
                (Ok(id), "edit") => Self::CourseEditor(id),
                (Ok(id), "learn") => Self::CoursePlayer(id),
                _ => Self::NotFound,
            },
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Courses => "/".to_string(),
            Self::CourseEditor(id) => format!("/courses/{}/edit", id),
            Self::CoursePlayer(id) => format!("/courses/{}/learn", id),
            Self::Profile => "/profile".to_string(),
            Self::Pricing => "/pricing".to_string(),
            Self::Payments => "/payments".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::NotFound)
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Courses
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_course_routes() {
        assert_eq!(AppRoute::from_path("/courses/12/edit"), AppRoute::CourseEditor(12));
        assert_eq!(AppRoute::from_path("/courses/12/learn/"), AppRoute::CoursePlayer(12));
        assert_eq!(AppRoute::from_path("/courses/x/edit"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/courses/12/delete"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/"), AppRoute::Courses);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
    }

    #[test]
    fn test_paths_round_trip() {
        for route in [
            AppRoute::Login,
            AppRoute::Courses,
            AppRoute::CourseEditor(3),
            AppRoute::CoursePlayer(4),
            AppRoute::Profile,
            AppRoute::Pricing,
            AppRoute::Payments,
        ] {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn test_guards() {
        assert!(!AppRoute::Login.requires_auth());
        assert!(!AppRoute::NotFound.requires_auth());
        assert!(AppRoute::CoursePlayer(1).requires_auth());
        assert!(AppRoute::Login.should_redirect_when_authenticated());
        assert!(!AppRoute::Courses.should_redirect_when_authenticated());
    }
}
