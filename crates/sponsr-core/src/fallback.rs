//! Built-in articles shown when the content backend is unavailable or empty.
//!
//! Fallback entries carry no slug: selecting one scrolls to the newsletter
//! signup instead of opening a detail page.

use crate::models::Entry;

struct FallbackArticle {
    title: &'static str,
    excerpt: &'static str,
    tag: &'static str,
    date: &'static str,
    read_time: &'static str,
    image: &'static str,
}

impl FallbackArticle {
    fn to_entry(&self) -> Entry {
        Entry {
            title: self.title.to_string(),
            excerpt: self.excerpt.to_string(),
            tag: self.tag.to_string(),
            date: self.date.to_string(),
            read_time: self.read_time.to_string(),
            image: self.image.to_string(),
            slug: String::new(),
            author: None,
            body: None,
        }
    }
}

const FEATURED: FallbackArticle = FallbackArticle {
    title: "The Death of the Gold-Silver-Bronze Model: Why Tiered Sponsorship Packages Are Failing Modern B2B Events",
    excerpt: "For decades, conference organisers have relied on the familiar Gold-Silver-Bronze sponsorship model. It's easy to understand, simple to sell, and universally recognised. But in today's B2B landscape, this legacy approach is leaving significant revenue on the table, and sophisticated sponsors know it. Here's why outcome-led sponsorship design is replacing tiered packages.",
    tag: "Sponsorship Strategy",
    date: "January 15, 2025",
    read_time: "8 min read",
    image: "https://images.unsplash.com/photo-1550751827-4bd374c3f58b?auto=format&fit=crop&q=80&w=1600",
};

const ARTICLES: [FallbackArticle; 6] = [
    FallbackArticle {
        title: "5 Signs Your Conference Is Under-Monetising Its Sponsor Potential",
        excerpt: "Strong attendance, quality content, senior audience, yet sponsorship revenue stays flat year after year. Here are the five warning signs that your commercial model needs a rethink.",
        tag: "Revenue Strategy",
        date: "January 8, 2025",
        read_time: "6 min read",
        image: "https://images.unsplash.com/photo-1553729459-efe14ef6055d?auto=format&fit=crop&q=80&w=800",
    },
    FallbackArticle {
        title: "The Sponsor's Perspective: What B2B Buyers Actually Want From Conference Partnerships",
        excerpt: "We interviewed 30 marketing directors responsible for B2B event sponsorship budgets. Their answers reveal a significant gap between what organisers offer and what sponsors actually value.",
        tag: "Market Research",
        date: "December 18, 2024",
        read_time: "10 min read",
        image: "https://images.unsplash.com/photo-1542744173-8e7e53415bb0?auto=format&fit=crop&q=80&w=800",
    },
    FallbackArticle {
        title: "Building a 12-Month Sponsorship Sales Calendar: When to Start, What to Prioritise",
        excerpt: "Timing is everything in sponsorship sales. Start too late and you're competing for leftover budget. This tactical guide maps out the ideal sponsorship sales timeline aligned with corporate budget cycles.",
        tag: "Sales Tactics",
        date: "December 5, 2024",
        read_time: "7 min read",
        image: "https://images.unsplash.com/photo-1506784983877-45594efa4cbe?auto=format&fit=crop&q=80&w=800",
    },
    FallbackArticle {
        title: "From One-Time Buyer to Multi-Year Partner: The Art of Sponsor Retention",
        excerpt: "Acquiring a new sponsor costs 5-7x more than retaining an existing one. Yet most organisers invest heavily in new business while neglecting renewals. Learn the frameworks that turn first-time sponsors into long-term partners.",
        tag: "Relationship Management",
        date: "November 22, 2024",
        read_time: "9 min read",
        image: "https://images.unsplash.com/photo-1521791136064-7986c2920216?auto=format&fit=crop&q=80&w=800",
    },
    FallbackArticle {
        title: "Pricing Sponsorship: How to Set Rates That Maximise Revenue Without Leaving Deals Behind",
        excerpt: "Price too high and you lose deals. Price too low and you leave money on the table. This guide breaks down the value-based pricing methodology that helps organisers find the optimal price point.",
        tag: "Pricing Strategy",
        date: "November 10, 2024",
        read_time: "8 min read",
        image: "https://images.unsplash.com/photo-1554224155-8d04cb21cd6c?auto=format&fit=crop&q=80&w=800",
    },
    FallbackArticle {
        title: "The ROI Conversation: Proving Sponsor Value in a Data-Driven World",
        excerpt: "Modern sponsors expect measurable outcomes, not just logo visibility. This article outlines practical approaches to quantifying sponsor ROI and building the data infrastructure to support renewal conversations.",
        tag: "Measurement & ROI",
        date: "October 28, 2024",
        read_time: "11 min read",
        image: "https://images.unsplash.com/photo-1551288049-bebda4e38f71?auto=format&fit=crop&q=80&w=800",
    },
];

/// The built-in featured article.
pub fn featured_entry() -> Entry {
    FEATURED.to_entry()
}

/// The built-in article list, newest first.
pub fn fallback_entries() -> Vec<Entry> {
    ARTICLES.iter().map(FallbackArticle::to_entry).collect()
}
