// Built-in keyword list and taxonomy used when the config file omits them
use super::CategoryConfig;

/// Seed keywords for the IT relevance filter. Order matters for tie-breaks.
const IT_KEYWORDS: &[&str] = &[
    "software", "developer", "programmer", "backend", "frontend",
    "fullstack", "devops", "data scientist", "machine learning",
    "artificial intelligence", "cloud", "azure", "gcp",
    "django", "flask", "react", "vue", "angular", "java", "python",
    "node", "javascript", "php", "sql", "database", "android", "mobile",
    "QA", "tester", "automation", "site reliability", "Video", "Page", "Content",
    "Digital", "3D", "Customer", "Social Media",
    "Data Analyst", "IT Support", "IT Specialist", "IT Consultant", "Network Engineer",
    "System Administrator", "Cybersecurity", "Security Analyst", "Cloud Engineer",
    "Software Architect", "Web Developer", "Mobile Developer", "Database Administrator",
    "Machine Learning Engineer", "AI Specialist", "Data Engineer", "Frontend Developer",
    "Backend Developer", "Full Stack Developer", "DevOps Engineer", "QA Engineer",
    "Test Automation Engineer", "Site Reliability Engineer", "IT Director",
    "Information Technology", "Information Systems", "Computer Science", "Computer Engineering",
    "Computer Operator", "Computer Technician", "Computer Programmer", "Software Development",
    "Software Engineering", "Web Design", "Web Development", "Network Administration",
    "System Administration", "Cybersecurity Analyst", "Data Science", "Data Analytics",
    "Business Intelligence", "Cloud Computing", "Cloud Services", "Cloud Solutions",
    "Cloud Infrastructure", "Page Moderator", "Content Creator", "Digital Marketing",
    "Digital Content", "Social Media Specialist", "Social Media Coordinator",
    "Customer Support", "Customer Service", "Customer Success", "Customer Experience",
    "Customer Relations", "Call Center Agent", "Technical Support", "Help Desk", "IT Helpdesk",
    "IT Support Specialist", "IT Support Technician", "Social Media Manager",
    "Laravel Developer", "React Developer", "Angular Developer", "Vue Developer",
    "Node.js Developer", "Python Developer", "Java Developer", "C# Developer", "C++ Developer",
    "Graphics Designer", "UI/UX Designer", "Product Designer", "Visual Designer",
    "Motion Graphics", "3D Artist", "Animator", "Video Editor", "Multimedia Specialist",
    "Mobile app developer", "Game developer", "Network administrator",
    "Cloud solutions architect", "Digital Strategist", "SEO Specialist",
    "Email Marketing Specialist", "Social Media Strategist", "Scrum Master", "Agile Coach",
    "Business Analyst", "AI Researcher", "Computer Hardware Repair",
    "Technical Writer", "IT Auditor", "IT Trainer", "Help Desk Technician",
    "Network Security Specialist", "Systems Analyst", "Cloud Administrator",
    "Cloud Security Specialist", "Big Data Engineer", "CCTV Installation",
    "Office Networking", "Support Engineer",
];

/// Short keywords that occur inside ordinary words ("retail", "maintenance",
/// "ratios"), so they only feed the fuzzy score and never count as hits.
const FUZZY_ONLY_KEYWORDS: &[&str] = &["ML", "AI", "aws", "ios", "sre", "Dev", "ISP"];

const TAXONOMY: &[(&str, &[&str])] = &[
    (
        "Software Engineering",
        &[
            "software developer", "software engineer", "developer", "programmer", "backend",
            "frontend", "fullstack", "django", "flask", "react", "vue", "angular", "java",
            "python", "c++", "c#", "node", "javascript", "php", "sql", "android", "ios",
            "mobile", "web developer", "mobile app developer", "game developer", "laravel",
        ],
    ),
    (
        "Data & AI",
        &[
            "data scientist", "machine learning", "ML", "AI", "artificial intelligence",
            "data analyst", "data engineer", "big data", "business intelligence",
            "data analytics", "ai researcher",
        ],
    ),
    (
        "DevOps & Cloud",
        &[
            "devops", "cloud", "aws", "azure", "gcp", "site reliability", "sre", "sysadmin",
            "system administrator", "cloud engineer", "cloud architect",
            "network administrator", "server",
        ],
    ),
    (
        "IT Support & Hardware",
        &[
            "it support", "help desk", "technician", "computer operator", "hardware", "network",
            "cctv", "repair", "isp", "technical support", "computer technician",
        ],
    ),
    (
        "Cybersecurity",
        &[
            "cybersecurity", "security analyst", "security engineer", "infosec", "auditor",
            "network security", "security specialist",
        ],
    ),
    (
        "Design & Creative",
        &[
            "graphics", "ui/ux", "product designer", "visual designer", "motion", "3d",
            "animator", "video editor", "multimedia", "adobe", "photoshop",
        ],
    ),
    (
        "Marketing & Content",
        &[
            "digital marketing", "seo", "social media", "content creator", "content manager",
            "marketing specialist", "ppc", "brand manager", "community manager", "affiliate",
        ],
    ),
    (
        "Management & Product",
        &[
            "project manager", "product manager", "scrum master", "agile", "business analyst",
            "it manager", "it director", "customer success", "customer support",
            "customer service",
        ],
    ),
    (
        "QA & Testing",
        &["qa", "tester", "automation", "quality assurance", "test engineer"],
    ),
];

pub fn default_keywords() -> Vec<String> {
    IT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

pub fn default_fuzzy_only_keywords() -> Vec<String> {
    FUZZY_ONLY_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

pub fn default_taxonomy() -> Vec<CategoryConfig> {
    TAXONOMY
        .iter()
        .map(|(name, keywords)| CategoryConfig {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        })
        .collect()
}
