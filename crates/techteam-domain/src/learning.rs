//! Gamification and learning catalogue enums.

string_enum! {
    pub enum Difficulty {
        Beginner => "beginner",
        Intermediate => "intermediate",
        Advanced => "advanced",
    }
}

string_enum! {
    /// Topic shared by challenges and resources.
    pub enum Category {
        Hardware => "hardware",
        Software => "software",
        Network => "network",
        Security => "security",
        Troubleshooting => "troubleshooting",
        BestPractices => "best_practices",
        Certifications => "certifications",
    }
}

string_enum! {
    pub enum ContentType {
        Article => "article",
        Video => "video",
        Interactive => "interactive",
        Document => "document",
    }
}

string_enum! {
    pub enum AchievementIcon {
        Trophy => "trophy",
        Medal => "medal",
        Star => "star",
        Fire => "fire",
        Lightning => "lightning",
        Gear => "gear",
        Wrench => "wrench",
        Rocket => "rocket",
        Shield => "shield",
        Crown => "crown",
    }
}

string_enum! {
    /// Progress of a student through a certification track.
    pub enum CertificationStatus {
        NotStarted => "not_started",
        InProgress => "in_progress",
        Earned => "earned",
    }
}

impl Default for CertificationStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}
