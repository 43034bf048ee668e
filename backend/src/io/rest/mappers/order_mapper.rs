use crate::domain::commands::orders::{
    IngestOrderCommand, IngestOrderResult, IngestOutcome, ListedOrder, OrderListQuery,
    OrderListResult, PageInfo,
};
use crate::domain::models::category::Category;
use shared::{
    IngestionEvent, IngestionOutcome, IngestionResponse, Order as SharedOrder, OrderCategory,
    OrderListRequest, OrderListResponse, PaginationInfo,
};

pub struct OrderMapper;

impl OrderMapper {
    pub fn category_to_dto(category: Category) -> OrderCategory {
        match category {
            Category::Scheduled => OrderCategory::Scheduled,
            Category::Paid => OrderCategory::Paid,
            Category::Receivable => OrderCategory::Receivable,
            Category::Overdue => OrderCategory::Overdue,
            Category::Failed => OrderCategory::Failed,
        }
    }

    pub fn to_dto(listed: ListedOrder) -> SharedOrder {
        let ListedOrder { order, category } = listed;
        SharedOrder {
            id: order.id,
            external_id: order.external_id,
            sale_time: order.sale_time,
            customer_name: order.customer_name,
            customer_phone: order.customer_phone,
            amount: order.amount,
            raw_status: order.raw_status,
            category: category.map(Self::category_to_dto),
            due_time: order.due_time,
            paid_time: order.paid_time,
            payment_method: order.payment_method,
            note: order.note,
        }
    }

    pub fn to_list_query(request: OrderListRequest) -> OrderListQuery {
        OrderListQuery {
            status: request.status,
            search: request.search,
            page: request.page,
            per_page: request.per_page,
        }
    }

    fn pagination_to_dto(page: PageInfo) -> PaginationInfo {
        PaginationInfo {
            page: page.page,
            per_page: page.per_page,
            total_items: page.total_items,
            total_pages: page.total_pages,
            has_more: page.has_more,
        }
    }

    pub fn to_list_response(result: OrderListResult) -> OrderListResponse {
        OrderListResponse {
            orders: result.orders.into_iter().map(Self::to_dto).collect(),
            pagination: Self::pagination_to_dto(result.pagination),
        }
    }

    pub fn to_ingest_command(event: IngestionEvent) -> IngestOrderCommand {
        IngestOrderCommand {
            transaction_id: event.transaction_id,
            raw_status: event.raw_status,
            amount: event.amount,
            customer_name: event.customer_name,
            customer_phone: event.customer_phone,
            payment_method: event.payment_method,
        }
    }

    pub fn to_ingestion_response(result: IngestOrderResult) -> IngestionResponse {
        IngestionResponse {
            outcome: match result.outcome {
                IngestOutcome::Created => IngestionOutcome::Created,
                IngestOutcome::Updated => IngestionOutcome::Updated,
                IngestOutcome::Ignored => IngestionOutcome::Ignored,
            },
            order_id: result.order.map(|o| o.id),
            category: result.category.map(Self::category_to_dto),
        }
    }
}
